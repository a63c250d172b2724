use anyhow::{Result, anyhow};
use console::style;

use crate::core::api::BackendClient;
use crate::core::api::types::CardDef;
use crate::core::cards::{ApiCardSource, CardCatalog};
use crate::core::terminal::{CARD, print_error, print_info, print_status, print_warn};

use super::{parse_api_url, parse_positional_args};

pub async fn run_cards_command(args: &[String]) -> Result<()> {
    let action = if args.len() > 2 { args[2].as_str() } else { "" };
    let client = BackendClient::new(&parse_api_url(args));
    let catalog = CardCatalog::new(ApiCardSource::new(client));
    match action {
        "list" | "ls" => list(&catalog).await,
        "show" | "get" => show(&catalog, args).await,
        _ => {
            print_error("Unknown or missing cards command. Expected: list, show");
            Ok(())
        }
    }
}

async fn list(catalog: &CardCatalog) -> Result<()> {
    let cards = catalog.all().await?;
    if cards.is_empty() {
        print_info("The card catalog is empty");
        return Ok(());
    }
    println!("  {} {}", CARD, style(format!("{} cards", cards.len())).bold());
    for card in cards {
        println!("    {}", format_card_line(card));
    }
    Ok(())
}

async fn show(catalog: &CardCatalog, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    if positional.is_empty() {
        return Err(anyhow!("cards show requires <name>"));
    }
    // Unquoted multi-word names arrive as separate args.
    let name = positional.join(" ");
    match catalog.get(&name).await? {
        Some(card) => {
            print_card(card);
            Ok(())
        }
        None => {
            print_warn(&format!("No card named '{}'", name));
            Ok(())
        }
    }
}

fn format_card_line(card: &CardDef) -> String {
    let mut line = format!("{:<24} {} mana  {}", card.name, card.cost, card.card_type);
    if let (Some(attack), Some(health)) = (card.attack, card.health) {
        line.push_str(&format!("  {}/{}", attack, health));
    }
    line
}

fn print_card(card: &CardDef) {
    println!("  {} {}", CARD, style(&card.name).bold());
    print_status("Cost", &card.cost.to_string());
    if !card.card_type.is_empty() {
        print_status("Type", &card.card_type);
    }
    if let (Some(attack), Some(health)) = (card.attack, card.health) {
        print_status("Stats", &format!("{}/{}", attack, health));
    }
    if let Some(text) = &card.text {
        print_status("Text", text);
    }
}
