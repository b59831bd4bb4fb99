//! Drives the plugin with a simulated platform and prints channel values.
//!
//! Run with `HARDWARE_BUTTONS_LOG_MODE=debug` to see resource lifecycle logs.

use std::sync::Arc;

use button_watcher::intent::{GO_TO_SLEEP_REASON_POWER_BUTTON, REASON_HOME_KEY, REASON_RECENT_APPS};
use button_watcher::Intent;
use hardware_buttons::logging::{init_logging_from_env, is_initialized};
use hardware_buttons::{HardwareButtonsPlugin, SimulatedPlatform, HOME_CHANNEL, LOCK_CHANNEL, VOLUME_CHANNEL};

fn main() -> hardware_buttons::Result<()> {
    if !is_initialized() {
        init_logging_from_env()?;
    }

    let platform = Arc::new(SimulatedPlatform::new());
    let mut plugin = HardwareButtonsPlugin::new();
    plugin.on_attached_to_engine();
    plugin.on_attached_to_activity(platform.clone())?;

    let volume = plugin.channel(VOLUME_CHANNEL)?.listen()?;
    let home = plugin.channel(HOME_CHANNEL)?.listen()?;
    let lock = plugin.channel(LOCK_CHANNEL)?.listen()?;
    println!("Active platform resources: {}", platform.active_count());

    platform.adjust_volume(1);
    platform.adjust_volume(-1);
    platform.send_broadcast(Intent::close_system_dialogs(REASON_RECENT_APPS));
    platform.send_broadcast(Intent::close_system_dialogs(REASON_HOME_KEY));
    platform.send_broadcast(Intent::screen_off(GO_TO_SLEEP_REASON_POWER_BUTTON));
    platform.send_broadcast(Intent::screen_off(GO_TO_SLEEP_REASON_POWER_BUTTON));

    for value in volume.try_iter() {
        println!("volume: {}", value);
    }
    for value in home.try_iter() {
        println!("home:   {}", value);
    }
    for value in lock.try_iter() {
        println!("lock:   {}", value);
    }
    println!("Active platform resources after lock: {}", platform.active_count());

    plugin.on_detached_from_engine()?;
    println!("Active platform resources after detach: {}", platform.active_count());
    Ok(())
}
