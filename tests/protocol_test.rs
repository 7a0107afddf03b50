extern crate std;

use libreroaster::control::state::{Event, Phase, Snapshot};
use libreroaster::input::linebuffer::LineBuffer;
use libreroaster::input::protocol::{
    format_connected, format_error, format_log, format_roast_event, format_roaster_state,
    parse_command, Command,
};

fn feed_line(buf: &mut LineBuffer, s: &str) -> std::vec::Vec<std::string::String> {
    let mut lines = std::vec::Vec::new();
    for b in s.bytes() {
        if let Some(line) = buf.push_byte(b) {
            lines.push(std::string::String::from(line.as_str()));
        }
    }
    lines
}

#[test]
fn framing_splits_multiple_lines_in_one_chunk() {
    let mut buf = LineBuffer::new();
    let lines = feed_line(&mut buf, "{\"type\":\"stop\"}\n{\"type\":\"exitFanOnly\"}\n");
    assert_eq!(lines.len(), 2);
    assert_eq!(parse_command(&lines[0]), Ok(Command::Event(Event::Stop)));
    assert_eq!(
        parse_command(&lines[1]),
        Ok(Command::Event(Event::ExitFanOnly))
    );
}

#[test]
fn every_simple_command_type_parses() {
    let cases = [
        ("{\"type\":\"stop\"}", Event::Stop),
        ("{\"type\":\"exitFanOnly\"}", Event::ExitFanOnly),
        ("{\"type\":\"endRoast\"}", Event::EndRoast),
        ("{\"type\":\"markFirstCrack\"}", Event::FirstCrack),
        ("{\"type\":\"enterManual\"}", Event::EnterManual),
        ("{\"type\":\"exitManual\"}", Event::ExitManual),
        ("{\"type\":\"clearFault\"}", Event::ClearFault),
    ];
    for (line, expected) in cases {
        assert_eq!(parse_command(line), Ok(Command::Event(expected)), "line: {line}");
    }
}

#[test]
fn payload_commands_parse_numeric_fields() {
    assert_eq!(
        parse_command("{\"type\":\"startPreheat\",\"payload\":{\"targetTemp\":180}}"),
        Ok(Command::Event(Event::StartPreheat(180.0)))
    );
    assert_eq!(
        parse_command("{\"type\":\"loadBeans\",\"payload\":{\"setpoint\":199.5}}"),
        Ok(Command::Event(Event::LoadBeans(199.5)))
    );
    assert_eq!(
        parse_command("{\"type\":\"setSetpoint\",\"payload\":{\"value\":199.5}}"),
        Ok(Command::Event(Event::SetSetpoint(199.5)))
    );
    assert_eq!(
        parse_command("{\"type\":\"setFanSpeed\",\"payload\":{\"value\":33}}"),
        Ok(Command::Event(Event::SetFanSpeed(33)))
    );
    assert_eq!(
        parse_command("{\"type\":\"setHeaterPower\",\"payload\":{\"value\":10}}"),
        Ok(Command::Event(Event::SetHeaterPower(10)))
    );
    assert_eq!(
        parse_command("{\"type\":\"enterFanOnly\",\"payload\":{\"fanSpeed\":65}}"),
        Ok(Command::Event(Event::StartFanOnly(Some(65))))
    );
}

#[test]
fn get_state_and_debug_hooks_are_recognized() {
    assert_eq!(parse_command("{\"type\":\"getState\"}"), Ok(Command::GetState));
    assert_eq!(parse_command("{\"type\":\"debugFan\"}"), Ok(Command::Noop));
    assert_eq!(parse_command("{\"type\":\"testFanPins\"}"), Ok(Command::Noop));
}

fn sample_snapshot() -> Snapshot {
    Snapshot {
        phase: Phase::Roasting,
        setpoint_c: 220.0,
        chamber_temp_c: Some(180.5),
        heater_temp_c: 30.0,
        ror_c_per_min: 12.3,
        fan_pct: 60,
        heater_pct: 80,
        heater_enabled: true,
        pid_enabled: true,
        fault_latched: false,
        fault_code: None,
        fault_message: None,
        fault_fatal: false,
        first_crack_marked: false,
        first_crack_offset_ms: None,
        roast_elapsed_ms: 120_000,
    }
}

#[test]
fn outbound_messages_carry_the_envelope_fields() {
    let connected = format_connected(42);
    assert!(connected.contains("\"type\":\"connected\""));
    assert!(connected.contains("\"timestamp\":42"));
    assert!(connected.contains("\"firmware\":"));

    let state_line = format_roaster_state(&sample_snapshot(), 1000);
    assert!(state_line.contains("\"type\":\"roasterState\""));
    assert!(state_line.contains("\"state\":\"ROASTING\""));
    assert!(state_line.contains("\"stateId\":3"));
    assert!(state_line.contains("\"chamberTemp\":180.50"));
    assert!(state_line.contains("\"error\":null"));

    let event_line = format_roast_event("FIRST_CRACK", 2000, Some(195.0));
    assert!(event_line.contains("\"type\":\"roastEvent\""));
    assert!(event_line.contains("FIRST_CRACK"));
    assert!(event_line.contains("\"roastTimeMs\":2000"));

    let error_line = format_error("OVER_TEMP_CHAMBER", "chamber temperature exceeded the safety limit", true, 3000);
    assert!(error_line.contains("\"type\":\"error\""));
    assert!(error_line.contains("\"code\":\"OVER_TEMP_CHAMBER\""));
    assert!(error_line.contains("\"fatal\":true"));

    let log_line = format_log("info", "safety", "hello", 4000);
    assert!(log_line.contains("\"type\":\"log\""));
    assert!(log_line.contains("\"level\":\"info\""));
    assert!(log_line.contains("\"source\":\"safety\""));
}

#[test]
fn roaster_state_reports_null_chamber_temp_and_error_while_faulted() {
    let mut snapshot = sample_snapshot();
    snapshot.phase = Phase::Error;
    snapshot.chamber_temp_c = None;
    snapshot.fault_latched = true;
    snapshot.fault_code = Some("THERMOCOUPLE_FAULT");
    snapshot.fault_message = Some("thermocouple reading persistently faulted");
    snapshot.fault_fatal = true;

    let line = format_roaster_state(&snapshot, 5000);
    assert!(line.contains("\"chamberTemp\":null"));
    assert!(line.contains("\"code\":\"THERMOCOUPLE_FAULT\""));
    assert!(line.contains("\"fatal\":true"));
}

#[test]
fn rejects_unknown_command_type() {
    use libreroaster::input::protocol::ParseError;
    assert_eq!(
        parse_command("{\"type\":\"notACommand\"}"),
        Err(ParseError::UnknownType)
    );
}
