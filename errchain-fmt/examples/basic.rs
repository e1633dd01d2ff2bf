//! Example: wrap, inspect and print an error chain
//!
//! Run with:
//!   cargo run --example basic
//!
//!   # Without stack snapshots:
//!   ERRCHAIN_STACK_DEPTH=0 cargo run --example basic

use anyhow::Context;
use errchain::{find_typed, new, wrap, Error, StackError};

#[derive(Debug, thiserror::Error)]
#[error("user {0} not found")]
struct UserNotFound(u64);

fn query(id: u64) -> errchain::Result<String> {
    Err(Error::new(UserNotFound(id)))
}

fn load_profile(id: u64) -> errchain::Result<String> {
    query(id).map_err(|err| err.wrap(new("loading profile")))
}

fn render_page(id: u64) -> Option<Error> {
    match load_profile(id) {
        Ok(_) => None,
        Err(err) => wrap(Some(err), Some(new("rendering page"))),
    }
}

fn main() -> anyhow::Result<()> {
    let err = render_page(42).context("expected a failure")?;

    // Default printer
    println!("Display:      {}", err);

    // Alternative printers
    println!("Reversed:     {}", errchain_fmt::reverse_printer().string(&err));
    println!("JSON:         {}", errchain_fmt::json_printer().string(&err));
    println!(
        "With stacks:  {}",
        errchain_fmt::default_and_short_stack_printer().string(&err)
    );

    // Typed lookup
    if let Some(UserNotFound(id)) = find_typed::<UserNotFound>(Some(&err)) {
        println!("Missing user: {}", id);
    }
    if let Some(stack) = err.find_typed::<StackError>() {
        println!("Stack frames:");
        for frame in stack.frames() {
            println!("  {}", frame);
        }
    }

    // errchain errors are std errors, so they flow into anyhow
    let result: anyhow::Result<()> = Err(err.into());
    if let Err(err) = result {
        println!("anyhow:       {:#}", err);
    }

    Ok(())
}
