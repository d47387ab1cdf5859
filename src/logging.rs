//! Console logging through the `log` facade.
//!
//! The packing engine itself never logs. Callers that want a trace pass
//! [`log_event`] as the progress callback.

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::optimizer::PackEvent;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => eprintln!("❌ {}", record.args()),
            Level::Warn => eprintln!("⚠️ {}", record.args()),
            Level::Info => println!("{}", record.args()),
            Level::Debug => println!("[DEBUG] {}", record.args()),
            Level::Trace => println!("[TRACE] {}", record.args()),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger.
///
/// Calling it again only adjusts the level.
pub fn init(level: LevelFilter) {
    // Fails only if a logger is already installed, which is fine.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Parses a level name such as `debug` or `WARN`.
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse::<LevelFilter>().ok()
}

/// Writes a packing event to the debug log.
pub fn log_event(event: &PackEvent) {
    match event {
        PackEvent::Started {
            total_items,
            container,
        } => {
            log::debug!(
                "Starting shelf packing with {} items into container {}",
                total_items,
                container
            );
        }
        PackEvent::ItemStarted { id, volume } => {
            log::debug!("Placing item {} (volume {})...", id, volume);
        }
        PackEvent::OrientationRejected {
            id,
            orientation,
            dims,
        } => {
            log::debug!(
                "Item {}: orientation {} ({}) does not fit in container",
                id,
                orientation,
                dims
            );
        }
        PackEvent::ShelfRejected {
            id,
            orientation,
            shelf_index,
        } => {
            log::debug!(
                "Item {}: orientation {} does not fit on shelf {}",
                id,
                orientation,
                shelf_index
            );
        }
        PackEvent::ShelfCreated {
            index,
            start_z,
            height,
        } => {
            log::debug!(
                "Creating shelf {} at Z={} (height {})",
                index,
                start_z,
                height
            );
        }
        PackEvent::ItemPlaced {
            id,
            orientation,
            shelf_index,
            pos,
            dims,
        } => {
            log::debug!(
                "Placed {} as {} ({}) on shelf {} at ({}, {}, {})",
                id,
                orientation,
                dims,
                shelf_index,
                pos.0,
                pos.1,
                pos.2
            );
        }
        PackEvent::ItemUnpacked {
            id, reason_text, ..
        } => {
            log::debug!("Item {} could not be placed: {}", id, reason_text);
        }
        PackEvent::BoundsViolated { violation } => {
            log::warn!("Bounds check: {}", violation);
        }
        PackEvent::Finished {
            packed,
            unpacked,
            utilization_percent,
        } => {
            log::debug!(
                "Packing completed. {} items placed, {} unpacked, {:.2}% utilization.",
                packed,
                unpacked,
                utilization_percent
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn logging_every_event_kind_does_not_panic() {
        init(LevelFilter::Off);
        let container = crate::model::Container::new((10, 10, 10), None).unwrap();
        let items = vec![
            crate::model::ItemInstance::new("A#1", "A", (6, 6, 6), true).unwrap(),
            crate::model::ItemInstance::new("A#2", "A", (6, 6, 6), true).unwrap(),
            crate::model::ItemInstance::new("B#1", "B", (12, 4, 4), true).unwrap(),
        ];
        let result = crate::optimizer::pack_items_with_progress(
            &container,
            &items,
            crate::optimizer::PackingConfig::default(),
            log_event,
        )
        .unwrap();
        assert_eq!(result.metrics.items_packed, 1);
    }
}
