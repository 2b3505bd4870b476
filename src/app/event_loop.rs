use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{App, Model, Services, update};

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is invalid, the first note cannot
    /// be read, or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let mut services = Services::for_dir(self.notes_dir.clone());
        let today = services.dates.today();
        let start = self.resolve_start_date(services.dates.as_ref())?;
        let note = services
            .notes
            .load(start)
            .with_context(|| format!("Failed to open note for {start}"))?;
        tracing::info!(
            date = %start,
            dir = %self.notes_dir.display(),
            exists = note.exists,
            "starting"
        );

        // Initialize terminal
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - labbook requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(note, today, (size.width, size.height))
            .with_tab_width(self.tab_width);
        model.notes_dir = Some(self.notes_dir.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        // Main loop
        let result = Self::event_loop(&mut terminal, &mut model, &mut services);

        // Restore terminal
        ratatui::restore();

        if model.is_dirty() {
            tracing::warn!(date = %model.current_date, "exited with unsaved changes");
        }
        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        services: &mut Services,
    ) -> Result<()> {
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let poll_ms = if needs_render { 0 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                Self::dispatch(&event::read()?, model, services);
                needs_render = true;

                // Coalesce key repeat bursts into a single render.
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    Self::dispatch(&event::read()?, model, services);
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Route one terminal event through `update` and run the effects it queues.
    fn dispatch(event: &event::Event, model: &mut Model, services: &mut Services) {
        let Some(msg) = super::input::handle_event(event, model) else {
            return;
        };
        tracing::trace!(?msg, "message");
        *model = update(std::mem::take(model), msg);
        services.drain_effects(model);
        // Keep the "(today)" marker right across midnight.
        model.today = services.dates.today();
    }
}
