//! One-shot AI assistant query

use anyhow::Result;
use smartfin_core::ai::{business_context, ChatBackend, ChatClient, ChatMessage};
use smartfin_core::db::Database;
use smartfin_core::models::User;
use smartfin_core::summarize;

/// How many recent transactions feed the assistant's context.
const CONTEXT_TRANSACTIONS: i64 = 10;

pub async fn cmd_chat(db: &Database, user: &User, message: &str) -> Result<()> {
    let Some(client) = ChatClient::from_env() else {
        anyhow::bail!(
            "Chat backend not configured. Set OLLAMA_HOST (or SMARTFIN_AI_BACKEND=mock for testing)."
        );
    };

    let records = db.ledger_records(user.id)?;
    let summary = summarize(&records);
    let recent = db.list_transactions(user.id, None, None, CONTEXT_TRANSACTIONS, 0)?;
    let product_count = db.count_products(user.id)?;

    let context = business_context(
        user.business_name.as_deref(),
        &summary,
        &recent,
        product_count,
    );

    println!("🤖 Asking {} ({})...", client.model(), client.host());

    let reply = client
        .chat(&[ChatMessage::system(context), ChatMessage::user(message)])
        .await?;

    println!();
    println!("{}", reply);

    Ok(())
}
