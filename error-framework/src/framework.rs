use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use database_adapter::DatabaseAdapter;
use error_common::{
    AppError, BacktraceProvider, BoxError, ErrorContext, ErrorLogger, ErrorManager, ManagerConfig,
    UuidTraceProvider, PANIC_DETAIL_KEY,
};
use once_cell::sync::OnceCell;
use validation_adapter::ValidationAdapter;

use crate::config::{DatabaseKind, FrameworkConfig};
use crate::error::{FrameworkError, Result};

/// The manager plus whichever source adapters are enabled.
pub struct Framework {
    manager: Arc<ErrorManager>,
    database: Option<DatabaseAdapter>,
    validation: Option<ValidationAdapter>,
}

impl Framework {
    pub fn new(
        manager: Arc<ErrorManager>,
        database: Option<DatabaseAdapter>,
        validation: Option<ValidationAdapter>,
    ) -> Self {
        Self {
            manager,
            database,
            validation,
        }
    }

    /// Assembles a framework from configuration around an existing logger.
    /// Installs nothing globally.
    pub fn from_config(config: &FrameworkConfig, logger: Arc<dyn ErrorLogger>) -> Self {
        let mut manager_config = ManagerConfig::new(logger);
        if config.trace.enabled {
            manager_config = manager_config.with_trace_provider(Arc::new(UuidTraceProvider::new()));
        }
        if config.stack_trace.enabled {
            let provider = BacktraceProvider::new().with_max_depth(config.stack_trace.max_depth);
            manager_config = manager_config.with_stack_trace_provider(Arc::new(provider));
        }

        let database = match config.database.kind {
            DatabaseKind::Postgres => Some(
                DatabaseAdapter::new()
                    .with_constraint_details(config.database.include_constraint_details)
                    .with_table_details(config.database.include_table_details),
            ),
            DatabaseKind::None => None,
        };

        let validation = config.validator.enabled.then(ValidationAdapter::new);

        Self::new(Arc::new(ErrorManager::new(manager_config)), database, validation)
    }

    pub fn manager(&self) -> &Arc<ErrorManager> {
        &self.manager
    }

    pub fn database(&self) -> Option<&DatabaseAdapter> {
        self.database.as_ref()
    }

    pub fn validation(&self) -> Option<&ValidationAdapter> {
        self.validation.as_ref()
    }

    /// Classifies a database error, a `sqlx::Error` or anything whose
    /// source chain holds one. The record is not logged.
    ///
    /// # Errors
    ///
    /// [`FrameworkError::AdapterDisabled`] when no database adapter is set.
    pub fn db<E>(&self, err: E) -> Result<AppError>
    where
        E: Into<BoxError>,
    {
        let adapter = self.database.as_ref().ok_or(FrameworkError::AdapterDisabled("database"))?;
        Ok(adapter.from_error(err))
    }

    /// Maps a validation error. The record is not logged.
    ///
    /// # Errors
    ///
    /// [`FrameworkError::AdapterDisabled`] when no validation adapter is set.
    pub fn validation_error(&self, err: &(dyn StdError + 'static)) -> Result<AppError> {
        let adapter = self
            .validation
            .as_ref()
            .ok_or(FrameworkError::AdapterDisabled("validation"))?;
        Ok(adapter.from_error(err))
    }

    pub fn handle<E>(&self, ctx: &ErrorContext, err: E) -> AppError
    where
        E: Into<BoxError>,
    {
        self.manager.handle(ctx, err)
    }

    /// Logs a recovered panic payload as a fatal record.
    pub fn recover(&self, ctx: &ErrorContext, payload: &(dyn Any + Send)) -> AppError {
        self.manager.handle_panic(ctx, payload)
    }
}

/// One-shot holder for a [`Framework`].
///
/// The first initializer wins; later ones are ignored. Concurrent first use
/// runs exactly one constructor.
pub struct FrameworkCell {
    cell: OnceCell<Framework>,
}

impl FrameworkCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_init<F>(&self, init: F) -> &Framework
    where
        F: FnOnce() -> Framework,
    {
        self.cell.get_or_init(init)
    }

    pub fn init(&self, framework: Framework) -> &Framework {
        self.cell.get_or_init(|| framework)
    }

    /// # Errors
    ///
    /// [`FrameworkError::NotInitialized`] before the first initialization.
    pub fn get(&self) -> Result<&Framework> {
        self.cell.get().ok_or(FrameworkError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for FrameworkCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the panic record that [`recover_and_wrap`](crate::recover_and_wrap)
/// wraps: the default internal-error shape with the payload attached.
pub(crate) fn panic_record(payload: &(dyn Any + Send)) -> AppError {
    AppError::builder()
        .with_detail(PANIC_DETAIL_KEY, error_common::panic_message(payload))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::{ErrorCode, ErrorLevel};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    #[derive(Default)]
    struct RecordingLogger {
        records: Mutex<Vec<(ErrorCode, ErrorLevel)>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log(&self, err: &AppError) {
            self.records.lock().push((err.code, err.level));
        }
    }

    fn framework(config: &FrameworkConfig) -> (Framework, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        (Framework::from_config(config, logger.clone()), logger)
    }

    #[test]
    fn test_from_config_honours_switches() {
        let mut config = FrameworkConfig::default();
        let (fw, _) = framework(&config);
        assert!(fw.database().is_none());
        assert!(fw.validation().is_some());

        config.database.kind = DatabaseKind::Postgres;
        config.validator.enabled = false;
        let (fw, _) = framework(&config);
        assert!(fw.database().is_some());
        assert!(fw.validation().is_none());
    }

    #[test]
    fn test_disabled_adapters_report_errors() {
        let mut config = FrameworkConfig::default();
        config.validator.enabled = false;
        let (fw, _) = framework(&config);

        assert!(matches!(
            fw.db(sqlx::Error::RowNotFound),
            Err(FrameworkError::AdapterDisabled("database"))
        ));
        let raw = std::io::Error::new(std::io::ErrorKind::Other, "bad input");
        assert!(matches!(
            fw.validation_error(&raw),
            Err(FrameworkError::AdapterDisabled("validation"))
        ));
    }

    #[test]
    fn test_db_uses_configured_adapter() {
        let mut config = FrameworkConfig::default();
        config.database.kind = DatabaseKind::Postgres;
        let (fw, logger) = framework(&config);

        let err = fw.db(sqlx::Error::RowNotFound).unwrap();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(logger.records.lock().is_empty());
    }

    #[test]
    fn test_db_classifies_wrapped_driver_errors() {
        let mut config = FrameworkConfig::default();
        config.database.kind = DatabaseKind::Postgres;
        let (fw, _) = framework(&config);

        let repo_err = anyhow::Error::new(sqlx::Error::RowNotFound).context("fetching visit");
        let err = fw.db(repo_err).unwrap();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.internal().unwrap().to_string(), "fetching visit");

        let err = fw.db(std::io::Error::new(std::io::ErrorKind::Other, "no route")).unwrap();
        assert_eq!(err.code, ErrorCode::DbError);
        assert!(err.is_sensitive);
    }

    #[test]
    fn test_handle_and_recover_log_through_manager() {
        let (fw, logger) = framework(&FrameworkConfig::default());

        let handled = fw.handle(&ErrorContext::new(), "boom");
        assert!(handled.trace_id.is_some());

        let payload: Box<dyn Any + Send> = Box::new("worker exploded");
        let recovered = fw.recover(&ErrorContext::new(), payload.as_ref());
        assert_eq!(recovered.level, ErrorLevel::Fatal);
        assert_eq!(
            recovered.details.get(PANIC_DETAIL_KEY),
            Some(&serde_json::json!("worker exploded"))
        );

        let records = logger.records.lock();
        assert_eq!(
            records.as_slice(),
            &[(ErrorCode::InternalError, ErrorLevel::Error), (ErrorCode::InternalError, ErrorLevel::Fatal)]
        );
    }

    #[test]
    fn test_cell_reports_not_initialized() {
        let cell = FrameworkCell::new();
        assert!(!cell.is_initialized());
        assert!(matches!(cell.get(), Err(FrameworkError::NotInitialized)));
    }

    #[test]
    fn test_first_initialization_wins() {
        let cell = FrameworkCell::new();
        let (first, _) = framework(&FrameworkConfig::default());
        let mut config = FrameworkConfig::default();
        config.database.kind = DatabaseKind::Postgres;
        let (second, _) = framework(&config);

        cell.init(first);
        let installed = cell.init(second);
        assert!(installed.database().is_none());
    }

    #[test]
    fn test_concurrent_first_use_constructs_once() {
        const THREADS: usize = 16;

        let cell = Arc::new(FrameworkCell::new());
        let constructed = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let constructed = Arc::clone(&constructed);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let fw = cell.get_or_init(|| {
                        constructed.fetch_add(1, Ordering::SeqCst);
                        framework(&FrameworkConfig::default()).0
                    });
                    Arc::as_ptr(fw.manager()) as usize
                })
            })
            .collect();

        let managers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert!(managers.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
