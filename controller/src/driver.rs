use async_channel::{Receiver, Sender, unbounded};
use futures::future::{self, Either};
use futures::pin_mut;
use geoscreen_location::{LocationBatch, LocationProvider};
use geoscreen_permission::PermissionGate;
use log::{debug, warn};

use crate::LocationScreenController;

/// A user or lifecycle action on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// The toggle button was pressed.
    Toggle,
    /// The screen left the foreground.
    Pause,
}

/// One input to the screen loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// A UI command.
    Command(UiCommand),
    /// A batch from the provider.
    Updates(LocationBatch),
}

/// Sending side of a running [`ScreenDriver`].
#[derive(Debug, Clone)]
pub struct ScreenHandle {
    commands: Sender<UiCommand>,
}

impl ScreenHandle {
    /// Press the toggle button.
    pub fn toggle(&self) -> bool {
        self.send(UiCommand::Toggle)
    }

    /// Pause the screen.
    pub fn pause(&self) -> bool {
        self.send(UiCommand::Pause)
    }

    /// Tear the screen down; the driver returns once queued commands are done.
    pub fn close(&self) {
        self.commands.close();
    }

    fn send(&self, command: UiCommand) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                warn!("screen command dropped: {err}");
                false
            }
        }
    }
}

/// Runs a controller as a single event loop.
///
/// Provider batches and UI commands are merged into one stream and applied
/// one at a time. When both are ready, waiting batches go first so fixes that
/// arrived before a stop are still shown.
#[derive(Debug)]
pub struct ScreenDriver<P, G> {
    controller: LocationScreenController<P, G>,
    commands: Receiver<UiCommand>,
}

impl<P: LocationProvider, G: PermissionGate> ScreenDriver<P, G> {
    /// Wrap `controller`, returning the driver and the handle feeding it.
    pub fn new(controller: LocationScreenController<P, G>) -> (Self, ScreenHandle) {
        let (sender, commands) = unbounded();
        (
            Self {
                controller,
                commands,
            },
            ScreenHandle { commands: sender },
        )
    }

    /// Create the screen, then process events until the handle is closed.
    /// Returns the controller for inspection.
    pub async fn run(mut self) -> LocationScreenController<P, G> {
        self.controller.on_create().await;
        let updates = self.controller.updates();

        loop {
            let event = {
                let batch = updates.recv();
                let command = self.commands.recv();
                pin_mut!(batch, command);
                match future::select(batch, command).await {
                    Either::Left((Ok(batch), _)) => ScreenEvent::Updates(batch),
                    Either::Right((Ok(command), _)) => ScreenEvent::Command(command),
                    Either::Right((Err(_), _)) => break,
                    // the controller holds a sink, so the update channel never closes
                    Either::Left((Err(_), _)) => break,
                }
            };
            self.apply(event).await;
        }

        debug!("location screen closed");
        self.controller
    }

    async fn apply(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Command(UiCommand::Toggle) => {
                let outcome = self.controller.toggle().await;
                debug!("toggle pressed: {outcome:?}");
            }
            ScreenEvent::Command(UiCommand::Pause) => {
                self.controller.on_pause().await;
            }
            ScreenEvent::Updates(batch) => {
                self.controller.handle_batch(&batch);
            }
        }
    }
}
