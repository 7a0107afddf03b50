//! Embassy tasks: one control loop, one transport reader, one transport
//! writer, all meeting at [`controller_cell`] and a single USB-serial
//! transport.

use embassy_executor::task;
use embassy_time::{Duration, Instant, Timer};
use log::{debug, info, warn};

use crate::application::controller_cell;
use crate::config::{CONTROL_TICK_MS, TELEMETRY_INTERVAL_MS, TRANSPORT_DISCONNECT_TIMEOUT_MS};
use crate::control::state::Event;
use crate::input::linebuffer::LineBuffer;
use crate::input::protocol::{self, Command};
use crate::output::IntervalScheduler;

#[task]
pub async fn control_loop_task() {
    info!("control loop started");

    let mut telemetry = IntervalScheduler::new(TELEMETRY_INTERVAL_MS);
    let mut was_fault_latched = false;
    let mut connected_on_activity_sent = false;
    let mut disconnected_posted = false;
    let start = Instant::now();

    let inbound = controller_cell::inbound_channel();
    let outbound = controller_cell::outbound_channel();

    let _ = outbound.try_send(protocol::format_connected(0));

    loop {
        let now_ms = Instant::now().duration_since(start).as_millis();

        while let Ok(line) = inbound.try_receive() {
            match protocol::parse_command(&line) {
                Ok(Command::Event(event)) => {
                    let fired =
                        controller_cell::with_controller(|c| c.handle_event(event, now_ms))
                            .unwrap_or(false);
                    if fired && event == Event::FirstCrack {
                        if let Ok(snapshot) = controller_cell::with_controller(|c| c.snapshot(now_ms)) {
                            let _ = outbound.try_send(protocol::format_roast_event(
                                "FIRST_CRACK",
                                now_ms,
                                snapshot.chamber_temp_c,
                            ));
                        }
                    }
                }
                Ok(Command::GetState) => {
                    if let Ok(snapshot) = controller_cell::with_controller(|c| c.snapshot(now_ms)) {
                        let _ = outbound.try_send(protocol::format_roaster_state(&snapshot, now_ms));
                    }
                }
                Ok(Command::Noop) => {}
                Err(e) => {
                    debug!("dropping unparseable command line: {e:?}");
                }
            }
        }

        if let Some(last_activity) = controller_cell::last_activity_ms() {
            if !connected_on_activity_sent {
                let _ = outbound.try_send(protocol::format_connected(now_ms));
                connected_on_activity_sent = true;
            }
            if now_ms.saturating_sub(last_activity) >= TRANSPORT_DISCONNECT_TIMEOUT_MS {
                if !disconnected_posted {
                    let _ = controller_cell::with_controller(|c| {
                        c.handle_event(Event::Disconnected, now_ms)
                    });
                    disconnected_posted = true;
                }
            } else {
                disconnected_posted = false;
            }
        }

        let tick_result = controller_cell::with_controller(|c| c.tick(now_ms));
        if let Err(e) = tick_result {
            warn!("controller_cell error in control loop: {e:?}");
        }

        let fault_now = controller_cell::with_controller(|c| c.snapshot(now_ms).fault_latched)
            .unwrap_or(false);
        if fault_now && !was_fault_latched {
            if let Ok(snapshot) =
                controller_cell::with_controller(|c| c.snapshot(now_ms))
            {
                if let (Some(code), Some(message)) = (snapshot.fault_code, snapshot.fault_message) {
                    let _ = outbound.try_send(protocol::format_error(
                        code,
                        message,
                        snapshot.fault_fatal,
                        now_ms,
                    ));
                }
            }
        }
        was_fault_latched = fault_now;

        if telemetry.should_fire() {
            if let Ok(snapshot) = controller_cell::with_controller(|c| c.snapshot(now_ms)) {
                let _ = outbound.try_send(protocol::format_roaster_state(&snapshot, now_ms));
            }
        }

        Timer::after(Duration::from_millis(CONTROL_TICK_MS)).await;
    }
}

#[task]
pub async fn transport_reader_task() {
    use crate::hardware::usb_cdc::get_usb_cdc_driver;

    info!("transport reader started");
    let inbound = controller_cell::inbound_channel();
    let mut line_buf = LineBuffer::new();
    let mut buf = [0u8; 64];
    let start = Instant::now();

    loop {
        if let Some(driver) = get_usb_cdc_driver() {
            if let Ok(n) = driver.read_bytes(&mut buf).await {
                if n > 0 {
                    controller_cell::record_activity(Instant::now().duration_since(start).as_millis());
                }
                for &byte in &buf[..n] {
                    if let Some(line) = line_buf.push_byte(byte) {
                        let _ = inbound.try_send(line);
                    }
                }
            }
        }
        Timer::after(Duration::from_millis(5)).await;
    }
}

#[task]
pub async fn transport_writer_task() {
    use crate::hardware::usb_cdc::get_usb_cdc_driver;

    info!("transport writer started");
    let outbound = controller_cell::outbound_channel();

    loop {
        if let Ok(line) = outbound.try_receive() {
            if let Some(driver) = get_usb_cdc_driver() {
                let mut bytes: heapless::Vec<u8, 272> = heapless::Vec::new();
                let _ = bytes.extend_from_slice(line.as_bytes());
                let _ = bytes.push(b'\n');
                let _ = driver.write_bytes(&bytes).await;
            }
        }
        Timer::after(Duration::from_millis(5)).await;
    }
}
