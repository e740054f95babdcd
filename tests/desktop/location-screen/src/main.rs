//! Desktop test binary for the location screen.
//!
//! Run with: cargo run -p geoscreen-location-screen -- [seconds]
//!
//! Creates the screen against the platform provider, presses the toggle,
//! follows updates for the given number of seconds (default 60), then pauses
//! and prints the log.

use std::time::Duration;

use geoscreen_controller::{LocationScreenController, ScreenConfig, ScreenDriver};
use geoscreen_location::sys::default_provider;
use geoscreen_permission::{Permission, SystemPermissionGate};

#[tokio::main]
async fn main() {
    env_logger::init();
    println!("=== Geoscreen Location Screen Test ===\n");

    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);

    for permission in Permission::LOCATION {
        let status = geoscreen_permission::check(permission).await;
        println!("{permission:?}: {status:?}");
    }

    let controller = LocationScreenController::new(
        default_provider(),
        SystemPermissionGate,
        ScreenConfig::default(),
    );
    let (driver, handle) = ScreenDriver::new(controller);

    let script = async {
        handle.toggle();
        println!("\nFollowing updates for {seconds}s...");
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        handle.pause();
        handle.close();
    };
    let (controller, ()) = tokio::join!(driver.run(), script);

    println!("\nSettings: {:?}", controller.settings_verdict());
    println!("Last location: {:?}", controller.last_location());
    println!("Button: {}", controller.button_text());
    println!("\n--- log ({} lines) ---", controller.log().len());
    print!("{}", controller.log().render());
}
