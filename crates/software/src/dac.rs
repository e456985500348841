//! Conversion from calibrated voltages to codes for the pitch CV <abbr title="digital-to-analog converter">DAC</abbr>.

use measurements::Voltage;

/// The largest code a 12-bit DAC channel accepts.
pub const MAX_CODE: u16 = 4095;

/// Converts a voltage to the 12-bit right-aligned code that approximates it, given the DAC's
/// output at full code.
///
/// The code is `floor(voltage / full_scale * 4095)`. Voltages are expected to lie in
/// `[0, full_scale]`; anything outside that range is clamped to the nearest end of the code
/// range and reported.
pub fn encode(voltage: Voltage, full_scale: Voltage) -> u16 {
    let code = voltage.as_volts() / full_scale.as_volts() * f64::from(MAX_CODE);
    #[cfg(feature = "defmt")]
    if code < 0.0 || code > f64::from(MAX_CODE) {
        defmt::warn!(
            "{} V cannot be represented by the DAC and will be clamped",
            voltage.as_volts()
        );
    }
    code.clamp(0.0, f64::from(MAX_CODE)) as u16
}
