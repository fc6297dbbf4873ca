//! Core types for the calibration table generator
//!
//! This module defines the values that flow through the pipeline: raw table
//! cells, device identifiers, calibration pairs and the per-board record that
//! gets rendered into the firmware's `board_adc_calibration_t` array.

use std::fmt;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Column holding the 96-bit device identifier
pub const ID_COLUMN: &str = "stm32id";

/// Errors that can occur while generating the calibration table
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Missing required column: {0}")]
    SchemaError(String),

    #[error("Invalid device identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Device identifier exceeds 96 bits: {0}")]
    IdentifierOverflow(String),

    #[error("Invalid calibration field: {0}")]
    InvalidField(String),

    #[error("Marker region not found in {0}")]
    MarkerNotFound(String),

    #[error("Failed to read table: {0}")]
    TableParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A single cell value as read from the input table
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Integer cell, wide enough for a full 96-bit identifier
    Int(i128),
    /// Floating-point cell (spreadsheets store most numbers this way)
    Float(f64),
    /// Text cell
    String(String),
    /// Boolean cell
    Bool(bool),
    /// Blank cell
    Empty,
}

impl CellValue {
    /// True for blank cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Infer a typed value from raw text, the way a dataframe reader does:
    /// integer first, then float, then plain text.
    ///
    /// The integer tier is 128 bits wide so decimal identifiers past `i64`
    /// never round through `f64`.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else if let Ok(v) = trimmed.parse::<i128>() {
            CellValue::Int(v)
        } else if let Ok(v) = trimmed.parse::<f64>() {
            CellValue::Float(v)
        } else {
            CellValue::String(trimmed.to_string())
        }
    }

    /// Short name of the cell type, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Int(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::String(_) => "string",
            CellValue::Bool(_) => "boolean",
            CellValue::Empty => "empty",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::String(v) => write!(f, "{:?}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Empty => write!(f, "<empty>"),
        }
    }
}

/// Device identifier as supplied by the table, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierValue {
    /// Native integer
    Integer(i128),
    /// `0x`/`0X` prefixed hexadecimal text
    HexString(String),
    /// Floating-point number; only accepted when integral
    Float(f64),
    /// Anything else (plain text, booleans, blanks)
    Other(String),
}

impl From<&CellValue> for IdentifierValue {
    fn from(cell: &CellValue) -> Self {
        match cell {
            CellValue::Int(v) => IdentifierValue::Integer(*v),
            CellValue::Float(v) => IdentifierValue::Float(*v),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("0x")) {
                    IdentifierValue::HexString(trimmed.to_string())
                } else {
                    IdentifierValue::Other(format!("string {:?}", s))
                }
            }
            other => IdentifierValue::Other(other.kind().to_string()),
        }
    }
}

/// A validated 96-bit device identifier (the STM32 unique ID)
///
/// Stored in a `u128`; the upper 32 bits are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u128);

impl DeviceId {
    /// Number of bits in a device identifier
    pub const BITS: u32 = 96;

    /// Largest representable identifier (2^96 - 1)
    pub const MAX: u128 = (1u128 << Self::BITS) - 1;

    /// Create an identifier, rejecting values wider than 96 bits
    pub fn new(value: u128) -> Result<Self> {
        if value > Self::MAX {
            return Err(GeneratorError::IdentifierOverflow(format!("0x{:x}", value)));
        }
        Ok(Self(value))
    }

    /// Build an identifier from three 32-bit words, most significant first
    pub fn from_words(words: [u32; 3]) -> Self {
        Self(((words[0] as u128) << 64) | ((words[1] as u128) << 32) | words[2] as u128)
    }

    /// Raw integer value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// The three 32-bit words, most significant first
    pub fn words(&self) -> [u32; 3] {
        [
            (self.0 >> 64) as u32,
            (self.0 >> 32) as u32,
            self.0 as u32,
        ]
    }

    /// Canonical 24-digit lowercase hex form
    pub fn to_hex(&self) -> String {
        format!("{:024x}", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Analog channels with a linear calibration, in struct member order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Chassis voltage
    ChassisVoltage,
    /// Chassis current
    ChassisCurrent,
    /// Motor current
    MotorCurrent,
    /// Capacitor bank voltage
    CapacitorVoltage,
    /// Capacitor bank current
    CapacitorCurrent,
}

impl Channel {
    /// All channels in the order the firmware struct declares them
    pub const ALL: [Channel; 5] = [
        Channel::ChassisVoltage,
        Channel::ChassisCurrent,
        Channel::MotorCurrent,
        Channel::CapacitorVoltage,
        Channel::CapacitorCurrent,
    ];

    /// Position of this channel within a record
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Column holding the scale (k) coefficient
    pub fn scale_column(&self) -> &'static str {
        match self {
            Channel::ChassisVoltage => "v_chassis_k",
            Channel::ChassisCurrent => "i_chassis_k",
            Channel::MotorCurrent => "i_motor_k",
            Channel::CapacitorVoltage => "v_cap_k",
            Channel::CapacitorCurrent => "i_cap_k",
        }
    }

    /// Column holding the offset (b) coefficient
    pub fn offset_column(&self) -> &'static str {
        match self {
            Channel::ChassisVoltage => "v_chassis_b",
            Channel::ChassisCurrent => "i_chassis_b",
            Channel::MotorCurrent => "i_motor_b",
            Channel::CapacitorVoltage => "v_cap_b",
            Channel::CapacitorCurrent => "i_cap_b",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::ChassisVoltage => write!(f, "chassis voltage"),
            Channel::ChassisCurrent => write!(f, "chassis current"),
            Channel::MotorCurrent => write!(f, "motor current"),
            Channel::CapacitorVoltage => write!(f, "capacitor voltage"),
            Channel::CapacitorCurrent => write!(f, "capacitor current"),
        }
    }
}

/// Every column a calibration table must provide
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![ID_COLUMN];
    for channel in Channel::ALL {
        columns.push(channel.scale_column());
        columns.push(channel.offset_column());
    }
    columns
}

/// Linear fit coefficients: `physical = k * raw + b`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationPair {
    /// Scale (k)
    pub scale: f64,
    /// Offset (b)
    pub offset: f64,
}

impl CalibrationPair {
    /// Create a new pair
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }
}

/// One board's calibration data, i.e. one spreadsheet row
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRecord {
    /// 1-based row number in the source table (header is row 1)
    pub row: usize,
    /// Device identifier
    pub id: DeviceId,
    /// Pairs indexed in `Channel::ALL` order
    pub pairs: [CalibrationPair; 5],
}

impl CalibrationRecord {
    /// Calibration pair for a given channel
    pub fn pair(&self, channel: Channel) -> CalibrationPair {
        self.pairs[channel.index()]
    }
}
