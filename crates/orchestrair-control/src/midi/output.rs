//! MIDI output via midir

use super::{MidiMessage, MidiSink};
use crate::error::{ControlError, Result};
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use tracing::info;

const CLIENT_NAME: &str = "OrchestrAir";

/// Connected MIDI output port
pub struct MidiOutputHandler {
    conn: MidiOutputConnection,
    port_name: String,
}

impl std::fmt::Debug for MidiOutputHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiOutputHandler")
            .field("port_name", &self.port_name)
            .finish()
    }
}

impl MidiOutputHandler {
    /// Names of the available output ports
    pub fn list_ports() -> Result<Vec<String>> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        Ok(midi_out
            .ports()
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect())
    }

    /// Connect to the first port whose name contains `wanted` (case-insensitive),
    /// or to the first port if `wanted` is `None`.
    pub fn connect(wanted: Option<&str>) -> Result<Self> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let ports = midi_out.ports();
        let named: Vec<(MidiOutputPort, String)> = ports
            .into_iter()
            .filter_map(|p| midi_out.port_name(&p).ok().map(|name| (p, name)))
            .collect();

        let index = select_port(named.iter().map(|(_, name)| name.as_str()), wanted)
            .ok_or_else(|| match wanted {
                Some(w) => ControlError::MidiError(format!("No MIDI output port matching '{}'", w)),
                None => ControlError::MidiError("No MIDI output ports available".to_string()),
            })?;
        let (port, port_name) = &named[index];

        let conn = midi_out
            .connect(port, "orchestrair-out")
            .map_err(|e| ControlError::MidiConnectionError(e.to_string()))?;
        info!("Opened MIDI output port: {}", port_name);

        Ok(Self {
            conn,
            port_name: port_name.clone(),
        })
    }

    /// Name of the connected port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Close the connection
    pub fn close(self) {
        self.conn.close();
    }
}

impl MidiSink for MidiOutputHandler {
    fn send(&mut self, message: &MidiMessage) -> Result<()> {
        self.conn.send(&message.to_bytes())?;
        Ok(())
    }
}

fn select_port<'a>(names: impl Iterator<Item = &'a str>, wanted: Option<&str>) -> Option<usize> {
    let names: Vec<&str> = names.collect();
    match wanted {
        Some(wanted) => {
            let wanted = wanted.to_lowercase();
            names
                .iter()
                .position(|name| name.to_lowercase().contains(&wanted))
        }
        None if names.is_empty() => None,
        None => Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_port() {
        let names = ["Midi Through Port-0", "FLUID Synth (1234)"];
        assert_eq!(select_port(names.into_iter(), Some("fluid")), Some(1));
        assert_eq!(select_port(names.into_iter(), None), Some(0));
        assert_eq!(select_port(names.into_iter(), Some("iac")), None);
        assert_eq!(select_port(std::iter::empty(), None), None);
    }
}
