//! Pin assignments for the MouldBot control board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relay expander (PCF8575, I2C)
// ---------------------------------------------------------------------------

/// I2C address of the PCF8575 relay expander.
pub const RELAY_EXPANDER_ADDR: u8 = 0x25;

/// Expander port bit driving the paper shredder relay.
pub const RELAY_SHREDDER: u8 = 0;
/// Expander port bit driving the mixer door relay.
pub const RELAY_DOOR: u8 = 1;
/// Spare relay channel (unpopulated on current boards).
pub const RELAY_SPARE: u8 = 2;
/// Expander port bit driving the starch feeder relay.
pub const RELAY_FEEDER: u8 = 3;
/// Expander port bit driving the mixer motor contactor.
pub const RELAY_MIXER: u8 = 4;
/// Expander port bit driving the water pump relay.
pub const RELAY_PUMP: u8 = 5;

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Operator buttons (active-low with internal pull-up)
// ---------------------------------------------------------------------------

pub const BTN_UP_GPIO: i32 = 5;
pub const BTN_DOWN_GPIO: i32 = 6;
pub const BTN_ENTER_GPIO: i32 = 7;
