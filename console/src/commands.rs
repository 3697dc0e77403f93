//! The four form actions, run against any `CustomerApi`.

use std::fmt;
use std::io::Write;

use customer_core::{ClientError, Customer, CustomerApi, Token};
use thiserror::Error;

use crate::cli::{Command, CustomerArgs};

/// What the user was doing when a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    List,
    Save,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Login => "Login",
            Action::List => "List",
            Action::Save => "Save",
            Action::Delete => "Delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Please provide a name.")]
    MissingName,

    #[error("Please provide an email.")]
    MissingEmail,

    #[error("{action} failed: {message}")]
    Failed { action: Action, message: String },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ConsoleError {
    fn failed(action: Action) -> impl FnOnce(ClientError) -> Self {
        move |err| ConsoleError::Failed {
            action,
            message: err.message(),
        }
    }
}

/// A command whose fields have passed validation.
enum Operation {
    List,
    Create { name: String, email: String },
    Update { id: i64, name: String, email: String },
    Delete { id: i64 },
}

impl Operation {
    /// Fields are checked here, before any network traffic.
    fn from_command(command: &Command) -> Result<Self, ConsoleError> {
        Ok(match command {
            Command::List => Operation::List,
            Command::Create(fields) => {
                let (name, email) = validate(fields)?;
                Operation::Create { name, email }
            }
            Command::Update { id, fields } => {
                let (name, email) = validate(fields)?;
                Operation::Update { id: *id, name, email }
            }
            Command::Delete { id } => Operation::Delete { id: *id },
        })
    }
}

/// Log in, then run `command` with the token, writing results to `out`.
pub fn run<W: Write>(
    api: &dyn CustomerApi,
    username: &str,
    password: &str,
    command: &Command,
    out: &mut W,
) -> Result<(), ConsoleError> {
    let operation = Operation::from_command(command)?;

    let token = api
        .login(username.trim(), password.trim())
        .map_err(ConsoleError::failed(Action::Login))?;
    tracing::debug!("logged in");

    match operation {
        Operation::List => list(api, &token, out),
        Operation::Create { name, email } => {
            let created = api
                .create_customer(&token, &name, &email)
                .map_err(ConsoleError::failed(Action::Save))?;
            writeln!(out, "Created customer {}", describe(&created))?;
            Ok(())
        }
        Operation::Update { id, name, email } => {
            let updated = api
                .update_customer(&token, id, &name, &email)
                .map_err(ConsoleError::failed(Action::Save))?;
            writeln!(out, "Updated customer {}", describe(&updated))?;
            Ok(())
        }
        Operation::Delete { id } => {
            api.delete_customer(&token, id)
                .map_err(ConsoleError::failed(Action::Delete))?;
            writeln!(out, "Deleted customer {id}")?;
            Ok(())
        }
    }
}

fn validate(fields: &CustomerArgs) -> Result<(String, String), ConsoleError> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(ConsoleError::MissingName);
    }
    let email = fields.email.trim();
    if email.is_empty() {
        return Err(ConsoleError::MissingEmail);
    }
    Ok((name.to_string(), email.to_string()))
}

fn list<W: Write>(api: &dyn CustomerApi, token: &Token, out: &mut W) -> Result<(), ConsoleError> {
    let customers = api
        .list_customers(token)
        .map_err(ConsoleError::failed(Action::List))?;
    write_table(&customers, out)?;
    Ok(())
}

fn describe(customer: &Customer) -> String {
    match customer.id {
        Some(id) => format!("#{id}: {} <{}>", customer.name, customer.email),
        None => format!("{} <{}>", customer.name, customer.email),
    }
}

/// `ID  NAME  EMAIL`, columns padded to their widest cell.
pub fn write_table<W: Write>(customers: &[Customer], out: &mut W) -> std::io::Result<()> {
    let ids: Vec<String> = customers
        .iter()
        .map(|c| c.id.map(|id| id.to_string()).unwrap_or_default())
        .collect();
    let id_width = ids.iter().map(String::len).chain(Some(2)).max().unwrap_or(2);
    let name_width = customers
        .iter()
        .map(|c| c.name.chars().count())
        .chain(Some(4))
        .max()
        .unwrap_or(4);

    writeln!(out, "{:<id_width$}  {:<name_width$}  EMAIL", "ID", "NAME")?;
    for (id, customer) in ids.iter().zip(customers) {
        writeln!(out, "{id:<id_width$}  {:<name_width$}  {}", customer.name, customer.email)?;
    }
    Ok(())
}
