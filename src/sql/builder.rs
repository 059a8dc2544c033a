//! Builds the parameterized statements used for persons and addresses.

use crate::model::{Address, Person};
use crate::sql::PgBindValue;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// Quote identifier for PostgreSQL (safe: only from configuration).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// Schema-qualified table names, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Tables {
    pub schema: String,
    pub persons: String,
    pub addresses: String,
}

impl Tables {
    pub fn new(schema: &str) -> Self {
        Tables {
            schema: quoted(schema),
            persons: qualified_table(schema, "persons"),
            addresses: qualified_table(schema, "addresses"),
        }
    }
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }

    /// Bind every param in order, ready to execute on any Postgres executor.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        tracing::debug!(sql = %self.sql, params = ?self.params, "query");
        let mut query = sqlx::query(&self.sql);
        for p in &self.params {
            query = query.bind(p.clone());
        }
        query
    }
}

/// Row filter for the joined person listing.
#[derive(Clone, Debug)]
pub enum PersonFilter<'a> {
    All,
    ById(i32),
    ByCity(&'a str),
}

/// SELECT persons joined to their address. Columns match `Person::from_joined_row`.
pub fn select_persons(tables: &Tables, filter: PersonFilter<'_>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = match filter {
        PersonFilter::All => String::new(),
        PersonFilter::ById(id) => format!(" WHERE p.\"id\" = ${}", q.push_param(id)),
        PersonFilter::ByCity(city) => format!(" WHERE a.\"city\" = ${}", q.push_param(city)),
    };
    q.sql = format!(
        "SELECT p.\"id\", p.\"first_name\", p.\"last_name\", p.\"age\", p.\"email\", p.\"address_id\", \
         a.\"country\", a.\"city\" \
         FROM {} p JOIN {} a ON a.\"id\" = p.\"address_id\"{} ORDER BY p.\"id\"",
        tables.persons, tables.addresses, where_clause
    );
    q
}

/// SELECT COUNT(*) of persons holding `email`, optionally ignoring one person id.
pub fn count_by_email(tables: &Tables, email: &str, exclude_id: Option<i32>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let email_ph = q.push_param(email);
    let exclude = match exclude_id {
        Some(id) => format!(" AND \"id\" <> ${}", q.push_param(id)),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT COUNT(*) FROM {} WHERE \"email\" = ${}{}",
        tables.persons, email_ph, exclude
    );
    q
}

/// Lock one person row for the rest of the transaction; yields its address id.
pub fn lock_person(tables: &Tables, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id);
    q.sql = format!(
        "SELECT \"id\", \"address_id\" FROM {} WHERE \"id\" = ${} FOR UPDATE",
        tables.persons, ph
    );
    q
}

pub fn insert_address(tables: &Tables, address: &Address) -> QueryBuf {
    let mut q = QueryBuf::new();
    let country = q.push_param(address.country.as_str());
    let city = q.push_param(address.city.as_str());
    q.sql = format!(
        "INSERT INTO {} (\"country\", \"city\") VALUES (${}, ${}) RETURNING \"id\"",
        tables.addresses, country, city
    );
    q
}

/// INSERT person referencing an already inserted address.
pub fn insert_person(tables: &Tables, person: &Person, address_id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let first = q.push_param(person.first_name.as_str());
    let last = q.push_param(person.last_name.as_str());
    let age = q.push_param(person.age);
    let email = q.push_param(person.email.as_str());
    let addr = q.push_param(address_id);
    q.sql = format!(
        "INSERT INTO {} (\"first_name\", \"last_name\", \"age\", \"email\", \"address_id\") \
         VALUES (${}, ${}, ${}, ${}, ${}) RETURNING \"id\"",
        tables.persons, first, last, age, email, addr
    );
    q
}

/// UPDATE the scalar person fields; `address_id` is never rewritten.
pub fn update_person(tables: &Tables, id: i32, person: &Person) -> QueryBuf {
    let mut q = QueryBuf::new();
    let first = q.push_param(person.first_name.as_str());
    let last = q.push_param(person.last_name.as_str());
    let age = q.push_param(person.age);
    let email = q.push_param(person.email.as_str());
    let id_ph = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET \"first_name\" = ${}, \"last_name\" = ${}, \"age\" = ${}, \"email\" = ${} WHERE \"id\" = ${}",
        tables.persons, first, last, age, email, id_ph
    );
    q
}

pub fn update_address(tables: &Tables, address_id: i32, address: &Address) -> QueryBuf {
    let mut q = QueryBuf::new();
    let country = q.push_param(address.country.as_str());
    let city = q.push_param(address.city.as_str());
    let id_ph = q.push_param(address_id);
    q.sql = format!(
        "UPDATE {} SET \"country\" = ${}, \"city\" = ${} WHERE \"id\" = ${}",
        tables.addresses, country, city, id_ph
    );
    q
}

pub fn delete_person(tables: &Tables, id: i32) -> QueryBuf {
    delete_by_id(&tables.persons, id)
}

pub fn delete_address(tables: &Tables, address_id: i32) -> QueryBuf {
    delete_by_id(&tables.addresses, address_id)
}

fn delete_by_id(table: &str, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id);
    q.sql = format!("DELETE FROM {} WHERE \"id\" = ${}", table, ph);
    q
}
