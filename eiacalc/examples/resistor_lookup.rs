//! Resistor lookup example: decode a marking or find the nearest standard value.

use eiacalc::prelude::*;

fn main() -> Result<(), EiaCalcError> {
    let input = std::env::args().nth(1).unwrap_or_else(|| "4.75k".to_string());
    let options = CalculatorOptions::default();

    // Try the input as an SMD marking first, then as a typed value
    if let Ok(report) = EiaCalcCore::decode(&input, &options) {
        println!("SMD code {} ({})", report.code, report.kind);
        println!("  Value:     {}", report.display);
        println!("  Tolerance: {}%", report.tolerance_percent);
        return Ok(());
    }

    let report = EiaCalcCore::lookup_text(&input, &options)?;
    println!("Nearest {} value to {}", report.series, report.input_display);
    println!("  Value:     {}", report.nearest_display);
    println!("  Error:     {:+.2}%", report.error_percent);
    println!("  Tolerance: {}%", report.tolerance);

    if report.is_standard {
        println!("\n{} is already a standard value.", report.input_display);
    }
    Ok(())
}
