//! Example: an error created in one tokio task and reported by another
//!
//! Run with:
//!   cargo run --example cross_task

use errchain::{new, wrap, wrap_with_opts, Error, StackError, StackOpts};
use tokio::sync::mpsc;

async fn download(part: u32) -> Result<Vec<u8>, Error> {
    tokio::task::yield_now().await;
    if part % 2 == 1 {
        let err = wrap(None, Some(new(format!("part {} truncated", part))));
        return Err(err.unwrap_or_else(|| new("download failed")));
    }
    Ok(vec![0; 16])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<(u32, Error)>(8);

    for part in 0..4 {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(err) = download(part).await {
                let _ = tx.send((part, err)).await;
            }
        });
    }
    drop(tx);

    let printer = errchain_fmt::default_and_short_stack_printer();
    while let Some((part, err)) = rx.recv().await {
        // The received chain already has the worker's stack; record ours too.
        let err = wrap_with_opts(
            Some(err),
            Some(new(format!("assembling part {}", part))),
            StackOpts::default().with_depth(4).with_same_stack(true),
        )
        .ok_or_else(|| anyhow::anyhow!("nothing to report"))?;

        let stacks = err.payloads().filter(|p| p.is::<StackError>()).count();
        println!("{} stacks: {}", stacks, printer.string(&err));
    }

    Ok(())
}
