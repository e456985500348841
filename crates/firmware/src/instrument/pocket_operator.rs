use crate::configuration::{Config, InstrumentConfig};
use measurements::Voltage;
use pocket_overture_lib::configuration::{PitchTable, VoiceMap};

/// The DAC's output at code 4095, as measured on the reference build.
const DAC_FULL_SCALE_VOLTS: f64 = 3.3;

pub struct PocketOperator {
    config: InstrumentConfig,
}

impl PocketOperator {
    fn new(config: InstrumentConfig) -> Self {
        Self { config }
    }
}

impl Default for PocketOperator {
    fn default() -> Self {
        Self::new(InstrumentConfig {
            pitch_table: PitchTable::default(),
            voice_map: VoiceMap::new(crate::VOICE_COUNT),
            full_scale: Voltage::from_volts(DAC_FULL_SCALE_VOLTS),
        })
    }
}

impl Config for PocketOperator {
    fn config(&self) -> &InstrumentConfig {
        &self.config
    }
}
