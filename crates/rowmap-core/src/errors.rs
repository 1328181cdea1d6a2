use thiserror::Error;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Boxed error carried by hook and driver failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log fields and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Registration
    InvalidTag,
    DuplicatePrimaryKey,
    IncompleteRelation,
    DuplicateColumn,

    // Structural usage
    NotRegistered,
    NoPrimaryKey,
    UnsupportedAutoIncrement,
    NestedTransaction,

    // Lookup
    NotFound,

    // Lifecycle hooks
    Hook,

    // Driver
    Driver,

    // Caller context
    Cancelled,
    DeadlineExceeded,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidTag => "ERR_INVALID_TAG",
            ErrorKind::DuplicatePrimaryKey => "ERR_DUPLICATE_PRIMARY_KEY",
            ErrorKind::IncompleteRelation => "ERR_INCOMPLETE_RELATION",
            ErrorKind::DuplicateColumn => "ERR_DUPLICATE_COLUMN",
            ErrorKind::NotRegistered => "ERR_NOT_REGISTERED",
            ErrorKind::NoPrimaryKey => "ERR_NO_PRIMARY_KEY",
            ErrorKind::UnsupportedAutoIncrement => "ERR_UNSUPPORTED_AUTO_INCREMENT",
            ErrorKind::NestedTransaction => "ERR_NESTED_TRANSACTION",
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::Hook => "ERR_HOOK",
            ErrorKind::Driver => "ERR_DRIVER",
            ErrorKind::Cancelled => "ERR_CANCELLED",
            ErrorKind::DeadlineExceeded => "ERR_DEADLINE_EXCEEDED",
        }
    }

    /// Whether the kind is raised while building metadata
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidTag
                | ErrorKind::DuplicatePrimaryKey
                | ErrorKind::IncompleteRelation
                | ErrorKind::DuplicateColumn
        )
    }
}

/// Comprehensive error taxonomy for rowmap operations
#[derive(Error, Debug)]
pub enum OrmError {
    // ===== Registration Errors =====
    /// Annotation could not be parsed
    #[error("Invalid tag on {entity}.{field}: {reason}")]
    InvalidTag {
        entity: String,
        field: String,
        reason: String,
    },

    /// More than one field carries `primaryKey`
    #[error("Entity {entity} declares more than one primary key: {first} and {second}")]
    DuplicatePrimaryKey {
        entity: String,
        first: String,
        second: String,
    },

    /// Relation descriptor is missing a required option
    #[error("Incomplete relation on {entity}.{field}: {reason}")]
    IncompleteRelation {
        entity: String,
        field: String,
        reason: String,
    },

    /// Two fields resolve to the same column name
    #[error("Entity {entity} maps more than one field to column {column}")]
    DuplicateColumn { entity: String, column: String },

    // ===== Structural Usage Errors =====
    /// Entity type was never registered
    #[error("Entity type not registered: {type_name}")]
    NotRegistered { type_name: String },

    /// Operation needs a primary key the entity does not declare
    #[error("Entity for table {table} has no primary key")]
    NoPrimaryKey { table: String },

    /// Auto-increment declared on a primary key that cannot hold a generated id
    #[error("Auto-increment primary key {table}.{field} must be an integer field")]
    UnsupportedAutoIncrement { table: String, field: String },

    /// `transaction` called on a transaction-scoped repository
    #[error("Nested transactions are not supported (table {table})")]
    NestedTransaction { table: String },

    // ===== Lookup =====
    /// Query returned no rows where one was required
    #[error("No rows found in {table}")]
    NotFound { table: String },

    // ===== Lifecycle Hooks =====
    /// A lifecycle hook returned an error
    ///
    /// Displays exactly as the hook's own error; `hook` names the callback.
    #[error("{source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: BoxError,
    },

    // ===== Driver =====
    /// Error raised by the underlying database driver
    #[error("Driver error during {op}: {source}")]
    Driver {
        op: String,
        #[source]
        source: BoxError,
    },

    // ===== Caller Context =====
    /// Caller cancelled the context before the statement ran
    #[error("Operation cancelled before executing on {table}")]
    Cancelled { table: String },

    /// Caller deadline elapsed before the statement ran
    #[error("Deadline exceeded before executing on {table}")]
    DeadlineExceeded { table: String },
}

impl OrmError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrmError::InvalidTag { .. } => ErrorKind::InvalidTag,
            OrmError::DuplicatePrimaryKey { .. } => ErrorKind::DuplicatePrimaryKey,
            OrmError::IncompleteRelation { .. } => ErrorKind::IncompleteRelation,
            OrmError::DuplicateColumn { .. } => ErrorKind::DuplicateColumn,
            OrmError::NotRegistered { .. } => ErrorKind::NotRegistered,
            OrmError::NoPrimaryKey { .. } => ErrorKind::NoPrimaryKey,
            OrmError::UnsupportedAutoIncrement { .. } => ErrorKind::UnsupportedAutoIncrement,
            OrmError::NestedTransaction { .. } => ErrorKind::NestedTransaction,
            OrmError::NotFound { .. } => ErrorKind::NotFound,
            OrmError::Hook { .. } => ErrorKind::Hook,
            OrmError::Driver { .. } => ErrorKind::Driver,
            OrmError::Cancelled { .. } => ErrorKind::Cancelled,
            OrmError::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// True for the "no rows" condition raised by `one()` and `find_by_id`
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Wrap a driver error, keeping it as the source
    pub fn driver(op: impl Into<String>, source: impl Into<BoxError>) -> Self {
        OrmError::Driver {
            op: op.into(),
            source: source.into(),
        }
    }

    /// Wrap a hook error, keeping it as the source
    pub fn hook(hook: &'static str, source: BoxError) -> Self {
        OrmError::Hook { hook, source }
    }

    /// The error a hook returned, if this is a hook failure
    pub fn hook_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            OrmError::Hook { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// The error the driver returned, if this is a driver failure
    pub fn driver_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            OrmError::Driver { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
