//! Line-delimited JSON command/telemetry protocol.
//!
//! Inbound commands are parsed with a permissive substring scan rather
//! than a full JSON parser, scanning for the `"type"` field and numeric
//! payload fields without tokenizing the whole line. Outbound lines are
//! built the same way: `write!`/`push_str` into a fixed heapless buffer,
//! no serialization crate.

use core::fmt::Write as _;
use heapless::String;

use crate::config::FIRMWARE_VERSION;
use crate::control::state::{Event, Snapshot};

pub type OutLine = String<256>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseError {
    NotJson,
    UnknownType,
    MissingField,
}

/// A parsed inbound line: either a state-machine event, a request for an
/// immediate telemetry push, or a recognized no-op (the debug hooks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Event(Event),
    GetState,
    Noop,
}

/// Parse one inbound command line.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if !(line.starts_with('{') && line.ends_with('}')) {
        return Err(ParseError::NotJson);
    }

    let command_type = extract_string_field(line, "type").ok_or(ParseError::MissingField)?;

    match command_type {
        "stop" => Ok(Command::Event(Event::Stop)),
        "enterFanOnly" => Ok(Command::Event(Event::StartFanOnly(
            extract_u8_field(line, "fanSpeed"),
        ))),
        "exitFanOnly" => Ok(Command::Event(Event::ExitFanOnly)),
        "startPreheat" => extract_f32_field(line, "targetTemp")
            .map(|v| Command::Event(Event::StartPreheat(v)))
            .ok_or(ParseError::MissingField),
        "loadBeans" => extract_f32_field(line, "setpoint")
            .map(|v| Command::Event(Event::LoadBeans(v)))
            .ok_or(ParseError::MissingField),
        "endRoast" => Ok(Command::Event(Event::EndRoast)),
        "markFirstCrack" => Ok(Command::Event(Event::FirstCrack)),
        "enterManual" => Ok(Command::Event(Event::EnterManual)),
        "exitManual" => Ok(Command::Event(Event::ExitManual)),
        "clearFault" => Ok(Command::Event(Event::ClearFault)),
        "setSetpoint" => extract_f32_field(line, "value")
            .map(|v| Command::Event(Event::SetSetpoint(v)))
            .ok_or(ParseError::MissingField),
        "setFanSpeed" => extract_u8_field(line, "value")
            .map(|v| Command::Event(Event::SetFanSpeed(v)))
            .ok_or(ParseError::MissingField),
        "setHeaterPower" => extract_u8_field(line, "value")
            .map(|v| Command::Event(Event::SetHeaterPower(v)))
            .ok_or(ParseError::MissingField),
        "getState" => Ok(Command::GetState),
        "debugFan" | "testFanPins" => Ok(Command::Noop),
        _ => Err(ParseError::UnknownType),
    }
}

fn extract_string_field<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let needle_owned = {
        let mut s: String<32> = String::new();
        let _ = write!(s, "\"{key}\"");
        s
    };
    let key_pos = json.find(needle_owned.as_str())?;
    let after_key = &json[key_pos + needle_owned.len()..];
    let colon = after_key.find(':')?;
    let after_colon = after_key[colon + 1..].trim_start();
    let rest = after_colon.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn extract_number_field<'a>(json: &'a str, key: &str) -> Option<&'a str> {
    let needle_owned = {
        let mut s: String<32> = String::new();
        let _ = write!(s, "\"{key}\"");
        s
    };
    let key_pos = json.find(needle_owned.as_str())?;
    let after_key = &json[key_pos + needle_owned.len()..];
    let colon = after_key.find(':')?;
    let after_colon = after_key[colon + 1..].trim_start();
    let end = after_colon
        .find(|c: char| c == ',' || c == '}' || c.is_whitespace())
        .unwrap_or(after_colon.len());
    Some(&after_colon[..end])
}

fn extract_f32_field(json: &str, key: &str) -> Option<f32> {
    extract_number_field(json, key)?.parse::<f32>().ok()
}

fn extract_u8_field(json: &str, key: &str) -> Option<u8> {
    extract_number_field(json, key)?.parse::<u8>().ok()
}

fn phase_name(phase: crate::control::state::Phase) -> &'static str {
    use crate::control::state::Phase;
    match phase {
        Phase::Off => "OFF",
        Phase::FanOnly => "FAN_ONLY",
        Phase::Preheat => "PREHEAT",
        Phase::Roasting => "ROASTING",
        Phase::Cooling => "COOLING",
        Phase::Manual => "MANUAL",
        Phase::Error => "ERROR",
    }
}

pub fn format_connected(timestamp_ms: u64) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(
        out,
        "{{\"type\":\"connected\",\"timestamp\":{timestamp_ms},\"payload\":{{\"firmware\":\"{FIRMWARE_VERSION}\"}}}}"
    );
    out
}

pub fn format_roaster_state(snapshot: &Snapshot, timestamp_ms: u64) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(
        out,
        "{{\"type\":\"roasterState\",\"timestamp\":{timestamp_ms},\"payload\":{{\
         \"state\":\"{}\",\"stateId\":{},\"chamberTemp\":",
        phase_name(snapshot.phase),
        snapshot.phase.id(),
    );
    match snapshot.chamber_temp_c {
        Some(t) => {
            let _ = write!(out, "{t:.2}");
        }
        None => {
            let _ = write!(out, "null");
        }
    }
    let _ = write!(
        out,
        ",\"heaterTemp\":{:.2},\"setpoint\":{:.2},\"fanSpeed\":{},\"heaterPower\":{},\
         \"heaterEnabled\":{},\"pidEnabled\":{},\"roastTimeMs\":{},\"firstCrackMarked\":{},\
         \"firstCrackTimeMs\":",
        snapshot.heater_temp_c,
        snapshot.setpoint_c,
        snapshot.fan_pct,
        snapshot.heater_pct,
        snapshot.heater_enabled,
        snapshot.pid_enabled,
        snapshot.roast_elapsed_ms,
        snapshot.first_crack_marked,
    );
    match snapshot.first_crack_offset_ms {
        Some(ms) => {
            let _ = write!(out, "{ms}");
        }
        None => {
            let _ = write!(out, "null");
        }
    }
    let _ = write!(out, ",\"ror\":{:.2},\"error\":", snapshot.ror_c_per_min);
    if snapshot.fault_latched {
        if let Some(code) = snapshot.fault_code {
            let _ = write!(
                out,
                "{{\"code\":\"{code}\",\"message\":\"{}\",\"fatal\":{}}}",
                snapshot.fault_message.unwrap_or(""),
                snapshot.fault_fatal,
            );
        } else {
            let _ = write!(out, "null");
        }
    } else {
        let _ = write!(out, "null");
    }
    let _ = write!(out, "}}}}");
    out
}

pub fn format_roast_event(name: &str, timestamp_ms: u64, chamber_temp_c: Option<f32>) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(
        out,
        "{{\"type\":\"roastEvent\",\"timestamp\":{timestamp_ms},\"payload\":{{\"event\":\"{name}\",\"roastTimeMs\":{timestamp_ms},\"chamberTemp\":"
    );
    match chamber_temp_c {
        Some(t) => {
            let _ = write!(out, "{t:.2}");
        }
        None => {
            let _ = write!(out, "null");
        }
    }
    let _ = write!(out, "}}}}");
    out
}

pub fn format_error(code: &str, message: &str, fatal: bool, timestamp_ms: u64) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(
        out,
        "{{\"type\":\"error\",\"timestamp\":{timestamp_ms},\"payload\":{{\"code\":\"{code}\",\"message\":\"{message}\",\"fatal\":{fatal}}}}}"
    );
    out
}

/// Escape `"`, `\`, and `\n` before framing a `log` message.
fn push_escaped(out: &mut OutLine, message: &str) {
    for ch in message.chars() {
        match ch {
            '"' => {
                let _ = out.push_str("\\\"");
            }
            '\\' => {
                let _ = out.push_str("\\\\");
            }
            '\n' => {
                let _ = out.push_str("\\n");
            }
            c => {
                let _ = out.push(c);
            }
        }
    }
}

pub fn format_log(level: &str, source: &str, message: &str, timestamp_ms: u64) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(
        out,
        "{{\"type\":\"log\",\"timestamp\":{timestamp_ms},\"payload\":{{\"level\":\"{level}\",\"source\":\"{source}\",\"message\":\""
    );
    push_escaped(&mut out, message);
    let _ = write!(out, "\"}}}}");
    out
}
