use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{
    now_utc, optional_value, parse_contact_id, parse_search_field, write_contact,
    write_contact_list,
};
use anyhow::{Context as _, Result};
use clap::Args;
use dialbook_core::domain::ContactDraft;
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Field to match: name, email or phone
    #[arg(long, default_value = "name")]
    pub by: String,
    pub value: String,
}

#[derive(Debug, Args)]
pub struct UpdatePhoneArgs {
    pub id: String,
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(required_unless_present = "phone")]
    pub id: Option<String>,
    #[arg(long, conflicts_with = "id")]
    pub phone: Option<String>,
}

pub fn add_contact(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let draft = ContactDraft::new(
        args.name,
        args.phone,
        args.email.as_deref().and_then(optional_value),
    );
    let contact = ctx.store.contacts().add(now_utc(), draft)?;
    debug!(id = %contact.id, "contact added");

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("created {} {} {}", contact.id, contact.name, contact.phone);
    }
    Ok(())
}

pub fn list_contacts(ctx: &Context<'_>) -> Result<()> {
    let contacts = ctx.store.contacts().list().with_context(|| "list contacts")?;
    if ctx.json {
        return print_json(&contacts);
    }

    if contacts.is_empty() {
        println!("No contacts found");
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    write_contact_list(&mut stdout, &contacts)?;
    stdout.flush()?;
    Ok(())
}

pub fn search_contacts(ctx: &Context<'_>, args: SearchArgs) -> Result<()> {
    let field = parse_search_field(&args.by)?;
    let contacts = ctx.store.contacts().search(field, &args.value)?;
    debug!(%field, matches = contacts.len(), "search finished");

    if ctx.json {
        return print_json(&contacts);
    }
    if contacts.is_empty() {
        println!("No contact found with {}: {}", field, args.value.trim());
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    write_contact_list(&mut stdout, &contacts)?;
    stdout.flush()?;
    Ok(())
}

pub fn update_phone(ctx: &Context<'_>, args: UpdatePhoneArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    let contact = ctx.store.contacts().update_phone(now_utc(), id, &args.phone)?;

    if ctx.json {
        print_json(&contact)?;
    } else {
        println!("updated {} {} {}", contact.id, contact.name, contact.phone);
    }
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let contacts = ctx.store.contacts();
    let removed = match (args.id, args.phone) {
        (Some(raw), None) => {
            let id = parse_contact_id(&raw)?;
            let contact = contacts
                .get(id)?
                .ok_or_else(|| not_found(format!("contact {id}")))?;
            contacts.delete(id)?;
            contact
        }
        (None, Some(phone)) => contacts.delete_by_phone(&phone)?,
        _ => return Err(invalid_input("provide either an id or --phone")),
    };

    if ctx.json {
        print_json(&removed)?;
    } else {
        let mut stdout = io::stdout().lock();
        write!(stdout, "deleted ")?;
        write_contact(&mut stdout, None, &removed)?;
    }
    Ok(())
}
