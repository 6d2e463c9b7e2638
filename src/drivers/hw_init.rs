//! One-shot hardware peripheral initialisation and raw pin access.
//!
//! Configures the ADC1 channels and relay GPIOs using raw ESP-IDF sys
//! calls. Called once from `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real oneshot-ADC conversions and GPIO register writes.
//! On host/test: conversions read from injectable atomics and GPIO writes
//! land in an inspectable level table, so drivers and adapters can be
//! exercised without hardware.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::error::Error;
use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── ADC1 channel map (plain ESP32: GPIO 32–39 → CH 4–7…) ─────

/// Thermocouple 1 — GPIO 32.
pub const ADC1_CH_THERMO1: u32 = 4;
/// Pilot flame sensor — GPIO 33.
pub const ADC1_CH_PILOT: u32 = 5;
/// Fan current sense — GPIO 34. Configured but unread (no feedback loop).
pub const ADC1_CH_FAN: u32 = 6;
/// Thermocouple 2 — GPIO 35.
pub const ADC1_CH_THERMO2: u32 = 7;

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: Called once from main() before any task spawns.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: written once by `init_adc()` before the control loop starts;
/// afterwards read-only from the control-loop task.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_THERMO1, ADC1_CH_THERMO2, ADC1_CH_PILOT] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC1 channel config failed"));
        }
    }

    info!("hw_init: ADC1 configured (CH4=thermo1, CH7=thermo2, CH5=pilot)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — written once during init_adc(),
    // read only from the control-loop task afterwards.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<()> {
    let output_pins = [
        pins::PILOT_EN_GPIO,
        pins::FIRE_EN_GPIO,
        pins::SENSE_EN_GPIO,
        pins::FAN_EN_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("relay GPIO config failed"));
        }
        // Leave the line untouched here; the relay drivers write the
        // de-energised level for their polarity during construction.
    }

    info!("hw_init: relay outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs().
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

    const ADC1_CHANNELS: usize = 8;
    const GPIO_COUNT: usize = 40;

    pub(super) static SIM_ADC: [AtomicU16; ADC1_CHANNELS] =
        [const { AtomicU16::new(0) }; ADC1_CHANNELS];

    // 0 = never written, 1 = low, 2 = high.
    pub(super) static SIM_GPIO: [AtomicU8; GPIO_COUNT] =
        [const { AtomicU8::new(0) }; GPIO_COUNT];

    pub(super) fn set_adc(channel: u32, raw: u16) {
        SIM_ADC[channel as usize].store(raw, Ordering::Relaxed);
    }

    pub(super) fn get_adc(channel: u32) -> u16 {
        SIM_ADC[channel as usize].load(Ordering::Relaxed)
    }

    pub(super) fn set_gpio(pin: i32, high: bool) {
        SIM_GPIO[pin as usize].store(if high { 2 } else { 1 }, Ordering::Relaxed);
    }

    pub(super) fn get_gpio(pin: i32) -> Option<bool> {
        match SIM_GPIO[pin as usize].load(Ordering::Relaxed) {
            1 => Some(false),
            2 => Some(true),
            _ => None,
        }
    }
}

/// Inject a simulated ADC conversion result (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    sim::set_adc(channel, raw);
}

/// Last level written to a simulated output pin, if any (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> Option<bool> {
    sim::get_gpio(pin)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    sim::get_adc(channel)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_gpio(pin, high);
}
