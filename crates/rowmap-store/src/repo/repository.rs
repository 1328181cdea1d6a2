//! Per-entity repository
//!
//! ## Logging Ownership
//!
//! The repository owns lifecycle logging for its operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Statement execution below it logs only at debug level.

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rowmap_core::dialect::{Dialect, SqliteDialect};
use rowmap_core::errors::OrmError;
use rowmap_core::model::{Entity, EntityMetadata, HookResult, Value};
use rowmap_core::query::{build_delete_by_pk, build_insert, build_update, Statement};
use rowmap_core::{log_op_end, log_op_error, log_op_start, SchemaRegistry};
use rowmap_core_types::schema::{
    OP_CREATE_TABLE, OP_DELETE, OP_DELETE_BY_ID, OP_DROP_TABLE, OP_FIND_BY_ID, OP_SAVE,
    OP_TRANSACTION,
};
use rusqlite::{Connection, Transaction};

use crate::context::Context;
use crate::errors::{from_rusqlite, Result};
use crate::exec::{self, ScannedRows};

use super::query::Query;

/// CRUD, query and transaction façade for entity type `E`
///
/// A repository borrows a connection and shares the entity's metadata and the
/// dialect read-only; it is cheap to clone.
pub struct Repository<'c, E: Entity> {
    conn: &'c Connection,
    registry: &'c SchemaRegistry,
    meta: Arc<EntityMetadata>,
    dialect: Arc<dyn Dialect>,
    ctx: Context,
    in_tx: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<'_, E> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            registry: self.registry,
            meta: Arc::clone(&self.meta),
            dialect: Arc::clone(&self.dialect),
            ctx: self.ctx.clone(),
            in_tx: self.in_tx,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> std::fmt::Debug for Repository<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("table", &self.meta.table_name)
            .field("dialect", &self.dialect.name())
            .field("in_tx", &self.in_tx)
            .finish()
    }
}

impl<'c, E: Entity> Repository<'c, E> {
    /// Repository over the process-wide registry
    ///
    /// # Errors
    /// * `NotRegistered` - `E` was never registered in the global registry
    pub fn new(conn: &'c Connection) -> Result<Self> {
        Self::with_registry(conn, SchemaRegistry::global())
    }

    /// Repository over an explicit registry
    ///
    /// # Errors
    /// * `NotRegistered` - `E` is not registered in `registry`
    pub fn with_registry(conn: &'c Connection, registry: &'c SchemaRegistry) -> Result<Self> {
        let meta = registry.require::<E>()?;
        Ok(Self {
            conn,
            registry,
            meta,
            dialect: Arc::new(SqliteDialect::new()),
            ctx: Context::background(),
            in_tx: false,
            _entity: PhantomData,
        })
    }

    /// Repository for another entity type sharing this one's connection,
    /// registry, context and transaction
    ///
    /// # Errors
    /// * `NotRegistered` - `U` is not registered
    pub fn repository<U: Entity>(&self) -> Result<Repository<'c, U>> {
        Ok(Repository {
            conn: self.conn,
            registry: self.registry,
            meta: self.registry.require::<U>()?,
            dialect: Arc::clone(&self.dialect),
            ctx: self.ctx.clone(),
            in_tx: self.in_tx,
            _entity: PhantomData,
        })
    }

    /// Copy bound to `ctx`; the receiver is unchanged
    pub fn with_context(&self, ctx: Context) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.meta
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Whether this repository runs inside `transaction`
    pub fn in_transaction(&self) -> bool {
        self.in_tx
    }

    /// Start a fluent query
    pub fn find(&self) -> Query<'c, E> {
        Query::new(self.clone())
    }

    /// Every row of the table
    pub fn find_all(&self) -> Result<Vec<E>> {
        self.find().all()
    }

    /// Number of rows in the table
    pub fn count(&self) -> Result<i64> {
        self.find().count()
    }

    /// Fetch one entity by primary key
    ///
    /// # Errors
    /// * `NoPrimaryKey` - the entity declares no primary key
    /// * `NotFound` - no row has this key
    pub fn find_by_id(&self, id: impl Into<Value>) -> Result<E> {
        let id = id.into();
        self.instrumented(OP_FIND_BY_ID, || {
            let pk = self.meta.require_primary_key()?;
            let condition = format!("{} = ?", self.dialect.quote_identifier(&pk.column_name));
            self.find().and_where(&condition, [id]).one()
        })
    }

    /// Insert or update, decided by the primary key's current value
    ///
    /// A zero key inserts; anything else updates. Generated auto-increment
    /// keys are written back onto `entity`.
    ///
    /// # Errors
    /// * `NoPrimaryKey` - the entity declares no primary key
    /// * `UnsupportedAutoIncrement` - auto-increment on a non-integer key
    /// * `Hook` - a lifecycle hook failed
    /// * `Driver` - the statement failed
    pub fn save(&self, entity: &mut E) -> Result<()> {
        self.instrumented(OP_SAVE, || self.save_inner(entity))
    }

    /// Delete the row matching `entity`'s primary key
    ///
    /// # Errors
    /// * `NoPrimaryKey` - the entity declares no primary key
    /// * `Hook` - a lifecycle hook failed
    /// * `Driver` - the statement failed
    pub fn delete(&self, entity: &mut E) -> Result<()> {
        self.instrumented(OP_DELETE, || {
            let pk = self.meta.require_primary_key()?;
            run_hook("before_delete", entity.before_delete())?;
            let id = entity.get(&pk.name).unwrap_or(Value::Null);
            let stmt = build_delete_by_pk(&self.meta, self.dialect.as_ref(), id)?;
            self.execute(&stmt)?;
            run_hook("after_delete", entity.after_delete())
        })
    }

    /// Delete the row with primary key `id`; no hooks run
    ///
    /// # Errors
    /// * `NoPrimaryKey` - the entity declares no primary key
    /// * `Driver` - the statement failed
    pub fn delete_by_id(&self, id: impl Into<Value>) -> Result<()> {
        let id = id.into();
        self.instrumented(OP_DELETE_BY_ID, || {
            let stmt = build_delete_by_pk(&self.meta, self.dialect.as_ref(), id)?;
            self.execute(&stmt).map(|_| ())
        })
    }

    /// Run `f` inside a transaction
    ///
    /// `f` receives a transaction-scoped repository. The transaction commits
    /// when `f` returns `Ok`, and rolls back when it returns `Err` or panics;
    /// a panic is resumed after the rollback.
    ///
    /// # Errors
    /// * `NestedTransaction` - called on a transaction-scoped repository
    /// * whatever `f` returns
    /// * `Driver` - BEGIN or COMMIT failed
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository<'_, E>) -> Result<T>,
    {
        self.instrumented(OP_TRANSACTION, || {
            if self.in_tx {
                return Err(OrmError::NestedTransaction {
                    table: self.meta.table_name.clone(),
                });
            }
            self.ctx.check(&self.meta.table_name)?;

            let tx = self
                .conn
                .unchecked_transaction()
                .map_err(|e| from_rusqlite("begin", e))?;

            let outcome = {
                let scoped = Repository::<'_, E> {
                    conn: &tx,
                    registry: self.registry,
                    meta: Arc::clone(&self.meta),
                    dialect: Arc::clone(&self.dialect),
                    ctx: self.ctx.clone(),
                    in_tx: true,
                    _entity: PhantomData,
                };
                panic::catch_unwind(AssertUnwindSafe(|| f(&scoped)))
            };

            match outcome {
                Ok(Ok(value)) => {
                    tx.commit().map_err(|e| from_rusqlite("commit", e))?;
                    Ok(value)
                }
                Ok(Err(err)) => {
                    self.rollback(tx);
                    Err(err)
                }
                Err(payload) => {
                    self.rollback(tx);
                    panic::resume_unwind(payload)
                }
            }
        })
    }

    /// CREATE TABLE IF NOT EXISTS plus one index per `index` field
    ///
    /// # Errors
    /// * `Driver` - a DDL statement failed
    pub fn create_table(&self) -> Result<()> {
        self.instrumented(OP_CREATE_TABLE, || {
            self.ctx.check(&self.meta.table_name)?;
            exec::execute_batch(self.conn, &self.dialect.create_table_sql(&self.meta))?;
            for sql in self.dialect.create_index_sqls(&self.meta) {
                exec::execute_batch(self.conn, &sql)?;
            }
            Ok(())
        })
    }

    /// DROP TABLE IF EXISTS
    ///
    /// # Errors
    /// * `Driver` - the statement failed
    pub fn drop_table(&self) -> Result<()> {
        self.instrumented(OP_DROP_TABLE, || {
            self.ctx.check(&self.meta.table_name)?;
            exec::execute_batch(self.conn, &self.dialect.drop_table_sql(&self.meta))
        })
    }

    // the caller's error or panic wins; a failed rollback is only logged
    fn rollback(&self, tx: Transaction<'_>) {
        if let Err(err) = tx.rollback() {
            tracing::warn!(
                op = OP_TRANSACTION,
                table = %self.meta.table_name,
                error = %err,
                "rollback failed"
            );
        }
    }

    pub(crate) fn metadata_arc(&self) -> Arc<EntityMetadata> {
        Arc::clone(&self.meta)
    }

    pub(crate) fn dialect_arc(&self) -> Arc<dyn Dialect> {
        Arc::clone(&self.dialect)
    }

    pub(crate) fn execute(&self, stmt: &Statement) -> Result<usize> {
        self.ctx.check(&self.meta.table_name)?;
        exec::execute(self.conn, stmt)
    }

    pub(crate) fn query_rows(&self, stmt: &Statement) -> Result<ScannedRows> {
        self.ctx.check(&self.meta.table_name)?;
        exec::query_rows(self.conn, stmt)
    }

    pub(crate) fn query_i64(&self, stmt: &Statement) -> Result<i64> {
        self.ctx.check(&self.meta.table_name)?;
        exec::query_i64(self.conn, stmt)
    }

    pub(crate) fn instrumented<T>(&self, op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let table = self.meta.table_name.as_str();
        log_op_start!(op, table = table);
        let start = Instant::now();

        match f() {
            Ok(value) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table
                );
                Ok(value)
            }
            Err(err) => {
                log_op_error!(
                    op,
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    table = table
                );
                Err(err)
            }
        }
    }

    fn save_inner(&self, entity: &mut E) -> Result<()> {
        let pk = self.meta.require_primary_key()?;
        let is_new = entity.get(&pk.name).map_or(true, |v| v.is_zero());

        if is_new && pk.is_auto_increment && !pk.kind.is_integer() {
            return Err(OrmError::UnsupportedAutoIncrement {
                table: self.meta.table_name.clone(),
                field: pk.name.clone(),
            });
        }

        run_hook("before_save", entity.before_save())?;

        if is_new {
            run_hook("before_create", entity.before_create())?;
            let stmt = build_insert(&self.meta, self.dialect.as_ref(), entity);
            self.execute(&stmt)?;

            if pk.is_auto_increment {
                let id = self.conn.last_insert_rowid();
                if !entity.set(&pk.name, Value::Int(id)) {
                    return Err(OrmError::UnsupportedAutoIncrement {
                        table: self.meta.table_name.clone(),
                        field: pk.name.clone(),
                    });
                }
                tracing::debug!(table = %self.meta.table_name, pk = id, "generated key assigned");
            }
            run_hook("after_create", entity.after_create())?;
        } else {
            run_hook("before_update", entity.before_update())?;
            let stmt = build_update(&self.meta, self.dialect.as_ref(), entity)?;
            let touched = self.execute(&stmt)?;
            tracing::debug!(table = %self.meta.table_name, row_count = touched, "update applied");
            run_hook("after_update", entity.after_update())?;
        }

        run_hook("after_save", entity.after_save())
    }
}

fn run_hook(name: &'static str, result: HookResult) -> Result<()> {
    result.map_err(|source| {
        tracing::warn!(hook = name, error = %source, "lifecycle hook failed");
        OrmError::hook(name, source)
    })
}
