//! C initializer rendering
//!
//! Turns calibration records into the literal text of a
//! `board_adc_calibration_t` array initializer:
//!
//! ```text
//! { { 0x00000000, 0x00000000, 0x00000222 }, { 0.0005554504f, 0.0000000000f }, ... }
//! ```
//!
//! Group order follows the struct member order and must not change.

use crate::config::RecordLayout;
use crate::identifier::identifier_literals;
use crate::types::{CalibrationPair, CalibrationRecord, Channel, GeneratorError, Result};

/// Format one coefficient as a C `float` literal with a fixed number of
/// fractional digits, e.g. `1.0` → `1.0000000000f`.
pub fn format_field(value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(GeneratorError::InvalidField(format!(
            "non-finite value {}",
            value
        )));
    }
    if value.abs() > f32::MAX as f64 {
        return Err(GeneratorError::InvalidField(format!(
            "{} is outside the single-precision float range",
            value
        )));
    }
    Ok(format!("{:.*}f", precision, value))
}

/// Renders records into initializer text
#[derive(Debug, Clone, Copy)]
pub struct RecordRenderer {
    precision: usize,
    layout: RecordLayout,
}

impl RecordRenderer {
    /// Create a renderer
    pub fn new(precision: usize, layout: RecordLayout) -> Self {
        Self { precision, layout }
    }

    /// `{ K, B }`
    pub fn render_pair(&self, pair: &CalibrationPair) -> Result<String> {
        Ok(format!(
            "{{ {}, {} }}",
            format_field(pair.scale, self.precision)?,
            format_field(pair.offset, self.precision)?
        ))
    }

    /// Render one record as a brace-wrapped struct initializer
    pub fn render_record(&self, record: &CalibrationRecord) -> Result<String> {
        let [id0, id1, id2] = identifier_literals(&record.id);
        let mut groups = Vec::with_capacity(Channel::ALL.len() + 1);
        groups.push(format!("{{ {}, {}, {} }}", id0, id1, id2));

        for channel in Channel::ALL {
            let pair = record.pair(channel);
            let rendered = self.render_pair(&pair).map_err(|e| match e {
                GeneratorError::InvalidField(msg) => GeneratorError::InvalidField(format!(
                    "row {}, {} ({}/{}): {}",
                    record.row,
                    channel,
                    channel.scale_column(),
                    channel.offset_column(),
                    msg
                )),
                other => other,
            })?;
            groups.push(rendered);
        }

        let separator = match self.layout {
            RecordLayout::Compact => ", ",
            RecordLayout::Multiline => ", \n",
        };
        Ok(format!("{{ {} }}", groups.join(separator)))
    }

    /// Render every record and join them with `,\n` (no trailing separator)
    pub fn assemble(&self, records: &[CalibrationRecord]) -> Result<String> {
        let rendered = records
            .iter()
            .map(|record| self.render_record(record))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(",\n"))
    }
}

impl Default for RecordRenderer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PRECISION, RecordLayout::Compact)
    }
}
