//! Variable references of the form `vm[.<resource>[.<interface>]].{rx|tx}`.

use std::fmt;

use crate::error::{Result, StoreError};

/// Which value of a `time:rx:tx` sample to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Rx,
    Tx,
}

impl SampleField {
    /// Position of the field after the leading timestamp.
    pub fn index(self) -> usize {
        match self {
            SampleField::Rx => 0,
            SampleField::Tx => 1,
        }
    }
}

impl fmt::Display for SampleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleField::Rx => write!(f, "rx"),
            SampleField::Tx => write!(f, "tx"),
        }
    }
}

/// A parsed variable reference.
///
/// Missing `resource` or `interface` match any value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    pub resource: Option<String>,
    pub interface: Option<String>,
    pub field: SampleField,
}

impl VariableRef {
    /// Parse a variable such as `vm.instance-01.tap0.tx`.
    ///
    /// Without an `rx`/`tx` suffix the received field is read.
    pub fn parse(variable: &str) -> Result<Self> {
        let invalid = || StoreError::InvalidVariable(variable.to_string());

        let mut parts: Vec<&str> = variable.split('.').collect();
        if parts.first() != Some(&"vm") {
            return Err(invalid());
        }
        parts.remove(0);

        let field = match parts.last() {
            Some(&"rx") => {
                parts.pop();
                SampleField::Rx
            }
            Some(&"tx") => {
                parts.pop();
                SampleField::Tx
            }
            _ => SampleField::Rx,
        };

        if parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let mut segments = parts.into_iter().map(str::to_string);
        Ok(Self {
            resource: segments.next(),
            interface: segments.next(),
            field,
        })
    }

    /// Redis key glob for this reference, e.g.
    /// `collectd/instance-01/virt/if_octets-*`.
    pub fn key_pattern(&self, prefix: &str, plugin: &str, type_instance: &str) -> String {
        format!(
            "{}/{}/{}/{}-{}",
            prefix,
            self.resource.as_deref().unwrap_or("*"),
            plugin,
            type_instance,
            self.interface.as_deref().unwrap_or("*"),
        )
    }
}
