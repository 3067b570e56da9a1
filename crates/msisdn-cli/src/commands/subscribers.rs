use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use msisdn_core::domain::{Msisdn, Subscriber};
use msisdn_core::{normalize, HELP_TEXT};
use serde::Serialize;

use crate::util::{format_timestamp_datetime, now_utc, parse_subscriber_id};

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(value_name = "NUMBER", help = HELP_TEXT)]
    pub number: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long, value_name = "NUMBER", help = HELP_TEXT)]
    pub number: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only subscribers whose stored number matches, after normalization
    #[arg(long, value_name = "NUMBER")]
    pub number: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Serialize)]
struct SubscriberDto {
    id: String,
    name: String,
    msisdn: String,
    created_at: i64,
    updated_at: i64,
}

impl From<&Subscriber> for SubscriberDto {
    fn from(subscriber: &Subscriber) -> Self {
        Self {
            id: subscriber.id.to_string(),
            name: subscriber.name.clone(),
            msisdn: subscriber.msisdn.as_str().to_string(),
            created_at: subscriber.created_at,
            updated_at: subscriber.updated_at,
        }
    }
}

fn normalize_required(ctx: &Context<'_>, input: &str) -> Result<Msisdn> {
    match normalize(Some(input), &ctx.config.normalizer) {
        Ok(Some(msisdn)) => Ok(msisdn),
        Ok(None) => Err(invalid_input("a mobile number is required")),
        Err(err) => Err(invalid_input(ctx.config.messages.render(&err))),
    }
}

pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let msisdn = normalize_required(ctx, &args.number)?;
    let subscriber = ctx.store.subscribers().create(now_utc(), &args.name, &msisdn)?;
    if ctx.json {
        print_json(&SubscriberDto::from(&subscriber))?;
    } else {
        println!("{}", subscriber.id);
    }
    Ok(())
}

pub fn edit(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    let id = parse_subscriber_id(&args.id)?;
    let msisdn = normalize_required(ctx, &args.number)?;
    let subscriber = ctx.store.subscribers().update_msisdn(now_utc(), &id, &msisdn)?;
    if ctx.json {
        print_json(&SubscriberDto::from(&subscriber))?;
    } else {
        println!("{} -> {}", subscriber.id, subscriber.msisdn);
    }
    Ok(())
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let subscribers = match args.number.as_deref() {
        Some(number) => {
            let msisdn = normalize_required(ctx, number)?;
            ctx.store.subscribers().find_by_msisdn(&msisdn)?
        }
        None => ctx.store.subscribers().list()?,
    };

    if ctx.json {
        let items: Vec<SubscriberDto> = subscribers.iter().map(SubscriberDto::from).collect();
        print_json(&items)?;
    } else {
        for subscriber in &subscribers {
            println!(
                "{}  {}  {}",
                subscriber.id, subscriber.msisdn, subscriber.name
            );
        }
    }
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_subscriber_id(&args.id)?;
    let subscriber = ctx.store.subscribers().get(&id)?;
    if ctx.json {
        print_json(&SubscriberDto::from(&subscriber))?;
    } else {
        println!("id: {}", subscriber.id);
        println!("name: {}", subscriber.name);
        println!("msisdn: {}", subscriber.msisdn);
        println!("created: {}", format_timestamp_datetime(subscriber.created_at));
        println!("updated: {}", format_timestamp_datetime(subscriber.updated_at));
    }
    Ok(())
}

pub fn delete(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_subscriber_id(&args.id)?;
    ctx.store.subscribers().delete(&id)?;
    if !ctx.json {
        println!("deleted {}", id);
    }
    Ok(())
}
