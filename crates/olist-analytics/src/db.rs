use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use postgres::types::Type;
use postgres::{Client, NoTls, Row};

use crate::config::DbConfig;
use crate::table::{Column, ColumnData, ResultTable};

/// Column shapes the query runner can materialize. Anything else (notably
/// NUMERIC) must be cast in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    Timestamp,
}

/// Map a Postgres column type onto a `ColumnKind`.
pub fn column_kind(ty: &Type) -> Result<ColumnKind> {
    if *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8 {
        Ok(ColumnKind::Int)
    } else if *ty == Type::FLOAT4 || *ty == Type::FLOAT8 {
        Ok(ColumnKind::Float)
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        Ok(ColumnKind::Text)
    } else if *ty == Type::TIMESTAMP || *ty == Type::TIMESTAMPTZ || *ty == Type::DATE {
        Ok(ColumnKind::Timestamp)
    } else {
        bail!(
            "Unsupported column type '{}'; cast it in the query (e.g. ::float8)",
            ty.name()
        )
    }
}

/// Open the single blocking connection used for a run.
pub fn connect(config: &DbConfig) -> Result<Client> {
    let client = postgres::Config::new()
        .host(&config.host)
        .port(config.port)
        .dbname(&config.dbname)
        .user(&config.user)
        .password(&config.password)
        .connect(NoTls)
        .with_context(|| {
            format!(
                "Failed to connect to postgres://{}@{}:{}/{}",
                config.user, config.host, config.port, config.dbname
            )
        })?;
    Ok(client)
}

/// Execute one fixed, parameterless query and materialize the full result.
///
/// The statement is prepared first so column names and types are known even
/// for an empty result set. Any connection or SQL error is fatal to the run.
pub fn run_query(client: &mut Client, name: &str, sql: &str) -> Result<ResultTable> {
    let statement = client
        .prepare(sql)
        .with_context(|| format!("Failed to prepare query '{}'", name))?;

    let kinds: Vec<(String, ColumnKind)> = statement
        .columns()
        .iter()
        .map(|c| Ok((c.name().to_string(), column_kind(c.type_())?)))
        .collect::<Result<_>>()
        .with_context(|| format!("Query '{}' projects an unsupported column", name))?;

    let rows = client
        .query(&statement, &[])
        .with_context(|| format!("Query '{}' failed", name))?;
    log::debug!("[{}] fetched {} rows", name, rows.len());

    let mut columns: Vec<Column> = kinds
        .iter()
        .map(|(col_name, kind)| Column {
            name: col_name.clone(),
            data: match kind {
                ColumnKind::Int => ColumnData::Int(Vec::with_capacity(rows.len())),
                ColumnKind::Float => ColumnData::Float(Vec::with_capacity(rows.len())),
                ColumnKind::Text => ColumnData::Text(Vec::with_capacity(rows.len())),
                ColumnKind::Timestamp => ColumnData::Timestamp(Vec::with_capacity(rows.len())),
            },
        })
        .collect();

    for row in &rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            push_cell(row, idx, column)
                .with_context(|| format!("Query '{}', column '{}'", name, column.name))?;
        }
    }

    Ok(ResultTable::new(name, columns))
}

fn push_cell(row: &Row, idx: usize, column: &mut Column) -> Result<()> {
    let ty = row.columns()[idx].type_();
    match &mut column.data {
        ColumnData::Int(values) => {
            let cell: Option<i64> = if *ty == Type::INT2 {
                row.try_get::<_, Option<i16>>(idx)?.map(i64::from)
            } else if *ty == Type::INT4 {
                row.try_get::<_, Option<i32>>(idx)?.map(i64::from)
            } else {
                row.try_get(idx)?
            };
            values.push(cell);
        }
        ColumnData::Float(values) => {
            let cell: Option<f64> = if *ty == Type::FLOAT4 {
                row.try_get::<_, Option<f32>>(idx)?.map(f64::from)
            } else {
                row.try_get(idx)?
            };
            values.push(cell);
        }
        ColumnData::Text(values) => {
            values.push(row.try_get(idx)?);
        }
        ColumnData::Timestamp(values) => {
            let cell = if *ty == Type::TIMESTAMPTZ {
                row.try_get::<_, Option<DateTime<Utc>>>(idx)?
                    .map(|ts| ts.naive_utc())
            } else if *ty == Type::DATE {
                row.try_get::<_, Option<NaiveDate>>(idx)?
                    .map(|d| d.and_time(NaiveTime::MIN))
            } else {
                row.try_get(idx)?
            };
            values.push(cell);
        }
    }
    Ok(())
}
