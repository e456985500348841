//! Pocket Overture is [Embassy](https://embassy.dev)-based firmware for a MIDI adapter driving a row of
//! [Pocket Operator](https://teenage.engineering/products/po) synthesizers, each of which has been modified
//! with a control-voltage pitch input and a gate line soldered across one of its buttons. The firmware runs
//! on the [Nucleo-F767ZI development board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which
//! is powered by an F7-series STM32 microcontroller.
//!
//! It works by translating USB-MIDI messages into [CV/gate](https://en.wikipedia.org/wiki/CV/gate) signals:
//! each MIDI channel plays one voice in the row, a voice's gate stays open while any of its channel's notes
//! are held, and a shared DAC line carries the pitch of the most recently struck note. Pitch is driven from a
//! measured calibration table rather than a volt-per-octave law, because the modified voice inputs do not
//! track linearly.
//!
//! For details about the hardware or how to use the device, see the `README`.

#![no_std]
#![no_main]

mod configuration;
mod instrument;

use crate::{configuration::Config as _, instrument::Instrument};
use defmt::{panic, *};
use embassy_executor::Spawner;
use embassy_stm32::{
    Config, bind_interrupts,
    dac::{Dac, DacCh1, DacCh2, Value},
    gpio::{Level, Output, Speed},
    mode::Async,
    peripherals::{self, DAC1},
    time::Hertz,
    usb,
};
use embassy_time::Timer;
use embassy_usb::{Builder, UsbDevice, class::midi::MidiClass, driver::EndpointError};
use pocket_overture_lib::{
    controller::{OutputUpdate, VoiceController},
    gate::GateState,
    note_event::NoteEvent,
    usb_midi,
};
use static_cell::StaticCell;

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        OTG_FS => usb::InterruptHandler<peripherals::USB_OTG_FS>;
    }
);

type UsbDriver = usb::Driver<'static, peripherals::USB_OTG_FS>;

/// The number of voices wired into the row, and therefore the number of gate lines the firmware drives.
pub(crate) const VOICE_COUNT: usize = 15;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing Pocket Overture");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            // per section 5.2 of RM0410: most peripheral clocks are derived from their bus clock, but the 48MHz clock used for USB OTG FS
            // is derived from main PLL VCO (PLLQ clock) or PLLSAI VCO (PLLSAI clock)
            divq: Some(PllQDiv::DIV9), // 8mhz / 4 * 216 / 9 = 48Mhz
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.mux.clk48sel = mux::Clk48sel::PLL1_Q;
    }
    let p = embassy_stm32::init(config);

    // set up the DAC to output pitch CV to the row
    // per RM0410 (the reference manual for the chip), DAC channel 1 outputs on port A, pin 4
    let dac_ch1_out = p.PA4;
    // DMA: direct memory access controller
    let dac_ch1_dma = p.DMA1_CH5;

    // the second DAC channel is reserved for a future second CV input to the row (perhaps an accent line)
    let dac_ch2_out = p.PA5;
    let dac_ch2_dma = p.DMA1_CH6;

    let (mut dac_ch1, dac_ch2) =
        Dac::new(p.DAC1, dac_ch1_dma, dac_ch2_dma, dac_ch1_out, dac_ch2_out).split();

    // rest at the bottom of the calibration table until the first note arrives
    dac_ch1.set(Value::Bit12Right(0));

    let mut gates: [Output<'static>; VOICE_COUNT] = [
        Output::new(p.PE2, Level::Low, Speed::Low),
        Output::new(p.PE3, Level::Low, Speed::Low),
        Output::new(p.PE4, Level::Low, Speed::Low),
        Output::new(p.PE5, Level::Low, Speed::Low),
        Output::new(p.PE6, Level::Low, Speed::Low),
        Output::new(p.PF0, Level::Low, Speed::Low),
        Output::new(p.PF1, Level::Low, Speed::Low),
        Output::new(p.PF2, Level::Low, Speed::Low),
        Output::new(p.PG2, Level::Low, Speed::Low),
        Output::new(p.PG3, Level::Low, Speed::Low),
        Output::new(p.PD3, Level::Low, Speed::Low),
        Output::new(p.PD4, Level::Low, Speed::Low),
        Output::new(p.PD5, Level::Low, Speed::Low),
        Output::new(p.PD6, Level::Low, Speed::Low),
        Output::new(p.PD7, Level::Low, Speed::Low),
    ];
    exercise_gates(&mut gates).await;

    // the Nucleo's green user LED doubles as a MIDI activity indicator
    let indicator = Output::new(p.PB0, Level::Low, Speed::Low);

    // Create the driver, from the HAL.
    static ENDPOINT_OUT_BUFFER: StaticCell<[u8; 256]> = StaticCell::new();
    let mut config = embassy_stm32::usb::Config::default();

    // USB devices which are self-powered (i.e., that can stay powered on if unplugged from the host)
    // need to enable vbus_detection to comply with the USB spec. Per section 6.10 of the Nucleo board
    // manual (UM1974), CN13 (the USB port) cannot power the board; external power is necessary.
    // See docs on `vbus_detection` for details.
    config.vbus_detection = true;

    let driver = usb::Driver::new_fs(
        p.USB_OTG_FS,
        Irqs,
        p.PA12,
        p.PA11,
        ENDPOINT_OUT_BUFFER.init([0; 256]),
        config,
    );

    // per https://pid.codes, FOSS projects can apply to be listed under the vendor ID owned by InterBiometrics
    let vendor_id = 0x1209;
    // product ID honors the PO-16 Factory, the first Pocket Operator wired into the row
    let product_id = 0x0016;

    let mut config = embassy_usb::Config::new(vendor_id, product_id);
    config.manufacturer = Some("Pawpaw Works");
    config.product = Some("Pocket Overture");
    config.self_powered = true;
    config.max_power = 0;

    // Create embassy-usb DeviceBuilder using the driver and config.
    // It needs some buffers for building the descriptors.
    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        CONTROL_BUFFER.init([0; 64]),
    );

    // Create classes on the builder.
    let class = MidiClass::new(&mut builder, 0, 1, 64);

    // Build the builder.
    let usb = builder.build();

    unwrap!(spawner.spawn(usb_task(usb)));
    unwrap!(spawner.spawn(midi_task(class, gates, dac_ch1, indicator)));
    unwrap!(spawner.spawn(tbd_task(dac_ch2)));
}

/// Walks the row at power-up, briefly opening each gate in turn: a quiet second, half a second
/// sounding, then back to rest. A voice that never blips is wired wrong.
async fn exercise_gates(gates: &mut [Output<'static>; VOICE_COUNT]) {
    for (voice, gate) in gates.iter_mut().enumerate() {
        gate.set_low();
        Timer::after_secs(1).await;
        gate.set_high();
        Timer::after_millis(500).await;
        gate.set_low();
        info!("Exercised the gate line for voice {}", voice);
    }
}

#[embassy_executor::task]
async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}

/// Task responsible for turning MIDI input into gate and pitch CV writes.
///
/// One task owns the MIDI class, the controller, and every output peripheral, so events are
/// committed to hardware strictly in arrival order.
#[embassy_executor::task]
async fn midi_task(
    mut class: MidiClass<'static, UsbDriver>,
    mut gates: [Output<'static>; VOICE_COUNT],
    mut dac: DacCh1<'static, DAC1, Async>,
    mut indicator: Output<'static>,
) -> ! {
    let instrument = Instrument::default();
    let config = instrument.config();
    assert_eq!(
        config.voice_map.voice_count(),
        gates.len(),
        "The voice map must address exactly the wired gate lines"
    );
    let mut controller =
        VoiceController::new(config.pitch_table, config.voice_map, config.full_scale);

    loop {
        class.wait_connection().await;
        info!("USB connected");
        let _ = process_midi(
            &mut class,
            &mut controller,
            &mut gates,
            &mut dac,
            &mut indicator,
        )
        .await;
        info!("USB disconnected");
    }
}

#[doc(hidden)]
struct Disconnected {}

impl From<EndpointError> for Disconnected {
    fn from(val: EndpointError) -> Self {
        match val {
            EndpointError::BufferOverflow => panic!("Buffer overflow"),
            EndpointError::Disabled => Disconnected {},
        }
    }
}

/// Helper function which interprets data received over USB.
///
/// Extracts note events from bytes and commits the writes each one requires, in arrival order.
/// The indicator LED is lit for the duration of each packet's processing.
async fn process_midi<'d, T: usb::Instance + 'd>(
    class: &mut MidiClass<'d, usb::Driver<'d, T>>,
    controller: &mut VoiceController,
    gates: &mut [Output<'static>; VOICE_COUNT],
    dac: &mut DacCh1<'static, DAC1, Async>,
    indicator: &mut Output<'static>,
) -> Result<(), Disconnected> {
    let mut buf = [0; 64];
    loop {
        let n = class.read_packet(&mut buf).await?;
        indicator.set_high();
        for message in usb_midi::messages(&buf[..n]) {
            match NoteEvent::from_midi(&message) {
                Some(event) => {
                    info!("Received {}", event);
                    apply(controller.handle(event), gates, dac);
                }
                None => {
                    let mut data = [0_u8; 3];
                    message.copy_to_slice(&mut data).unwrap();
                    info!("Received unsupported MIDI message: {}", data);
                }
            }
        }
        indicator.set_low();
    }
}

/// Commits an [`OutputUpdate`] to the hardware. The pitch write lands before the gate write, so
/// a voice whose gate is opening never sounds a stale pitch.
fn apply(
    update: OutputUpdate,
    gates: &mut [Output<'static>; VOICE_COUNT],
    dac: &mut DacCh1<'static, DAC1, Async>,
) {
    if let Some(code) = update.dac {
        info!("Sending {} to the pitch DAC", code);
        dac.set(Value::Bit12Right(code));
    }
    if let Some(command) = update.gate {
        let gate = &mut gates[command.voice];
        match command.state {
            GateState::High => gate.set_high(),
            GateState::Low => gate.set_low(),
        }
    }
}

/// Placeholder task to ensure both DAC channels are used, preventing the DAC itself from being disabled;
/// see <https://github.com/embassy-rs/embassy/issues/4577>.
#[embassy_executor::task]
async fn tbd_task(dac: DacCh2<'static, DAC1, Async>) -> ! {
    loop {
        Timer::after_secs(60).await;
        info!("TBD task placeholder DAC reading: {}", dac.read());
    }
}
