use crate::commands::Context;
use crate::error::{invalid_input, is_fatal, not_found};
use crate::util::{
    now_utc, optional_value, parse_contact_id, parse_search_field, write_contact_list,
    write_import_report,
};
use anyhow::Result;
use dialbook_core::domain::{ContactDraft, ContactId, SearchField};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

const MENU: &str = "\n==== Contact Manager ====
1. Import contacts from JSON file
2. Add a new contact
3. Show all contacts
4. Find a contact
5. Update phone number
6. Delete a contact
7. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Import,
    Add,
    List,
    Find,
    UpdatePhone,
    Delete,
    Exit,
}

impl Choice {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Choice::Import),
            "2" => Some(Choice::Add),
            "3" => Some(Choice::List),
            "4" => Some(Choice::Find),
            "5" => Some(Choice::UpdatePhone),
            "6" => Some(Choice::Delete),
            "7" => Some(Choice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Runs the interactive menu until the user picks exit or input ends.
///
/// Errors tied to a single request are printed and the loop continues.
/// Database failures are printed with their cause, end the session and
/// are returned to the caller.
pub fn run<R: BufRead, W: Write>(ctx: &Context<'_>, input: R, out: W) -> Result<()> {
    let mut menu = Menu { ctx, input, out };
    menu.run()
}

struct Menu<'a, R, W> {
    ctx: &'a Context<'a>,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{MENU}")?;
            let Some(raw) = self.prompt("Enter your choice (1-7): ")? else {
                break;
            };
            let Some(choice) = Choice::parse(&raw) else {
                writeln!(self.out, "Invalid choice. Please try again.")?;
                continue;
            };
            debug!(?choice, "menu selection");

            match self.dispatch(choice) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) if is_fatal(&err) => {
                    writeln!(self.out, "error: {err:#}")?;
                    writeln!(self.out, "Closing Contact Manager.")?;
                    self.out.flush()?;
                    return Err(err);
                }
                Err(err) => writeln!(self.out, "error: {err}")?,
            }
        }

        writeln!(self.out, "Exiting Contact Manager. Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, choice: Choice) -> Result<Flow> {
        match choice {
            Choice::Import => self.import(),
            Choice::Add => self.add(),
            Choice::List => self.list(),
            Choice::Find => self.find(),
            Choice::UpdatePhone => self.update_phone(),
            Choice::Delete => self.delete(),
            Choice::Exit => Ok(Flow::Exit),
        }
    }

    fn import(&mut self) -> Result<Flow> {
        let default_file = self.ctx.config.import.default_file.clone();
        let Some(raw) = self.prompt(&format!(
            "Enter JSON file path (default: {}): ",
            default_file.display()
        ))?
        else {
            return Ok(Flow::Exit);
        };
        let file = optional_value(&raw).map(PathBuf::from).unwrap_or(default_file);

        let report = dialbook_import::import_file(
            self.ctx.store,
            &file,
            self.ctx.config.import.on_duplicate,
            now_utc(),
        )?;
        write_import_report(&mut self.out, &report)?;
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter contact name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.prompt("Enter contact email (optional): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(phone) = self.prompt("Enter contact phone: ")? else {
            return Ok(Flow::Exit);
        };

        let draft = ContactDraft::new(name, phone, optional_value(&email));
        let contact = self.ctx.store.contacts().add(now_utc(), draft)?;
        writeln!(
            self.out,
            "Contact {} added successfully (id {}, phone {})",
            contact.name, contact.id, contact.phone
        )?;
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> Result<Flow> {
        let contacts = self.ctx.store.contacts().list()?;
        if contacts.is_empty() {
            writeln!(self.out, "No contacts found")?;
        } else {
            writeln!(self.out, "\n==== All Contacts ====")?;
            write_contact_list(&mut self.out, &contacts)?;
        }
        Ok(Flow::Continue)
    }

    fn find(&mut self) -> Result<Flow> {
        let Some(raw_field) = self.prompt("Search by (name/email/phone): ")? else {
            return Ok(Flow::Exit);
        };
        let field = parse_search_field(&raw_field)?;
        let Some(value) = self.prompt(&format!("Enter {field}: "))? else {
            return Ok(Flow::Exit);
        };

        let contacts = self.ctx.store.contacts().search(field, &value)?;
        if contacts.is_empty() {
            writeln!(self.out, "No contact found with {field}: {}", value.trim())?;
        } else {
            writeln!(self.out, "\n==== Contact Found ====")?;
            write_contact_list(&mut self.out, &contacts)?;
        }
        Ok(Flow::Continue)
    }

    fn update_phone(&mut self) -> Result<Flow> {
        let Some(target) = self.prompt_target("Find contact by (id/phone/email/name): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(new_phone) = self.prompt("Enter new phone number: ")? else {
            return Ok(Flow::Exit);
        };

        let contact = self
            .ctx
            .store
            .contacts()
            .update_phone(now_utc(), target, &new_phone)?;
        writeln!(
            self.out,
            "Phone number updated successfully for {}: {}",
            contact.name, contact.phone
        )?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Result<Flow> {
        let Some(target) = self.prompt_target("Delete contact by (id/phone/email/name): ")? else {
            return Ok(Flow::Exit);
        };
        let contacts = self.ctx.store.contacts();
        let contact = contacts
            .get(target)?
            .ok_or_else(|| not_found(format!("contact {target}")))?;

        let Some(confirm) = self.prompt(&format!(
            "Are you sure you want to delete {} ({})? (y/n): ",
            contact.name, contact.phone
        ))?
        else {
            return Ok(Flow::Exit);
        };
        if !confirm.trim().eq_ignore_ascii_case("y") {
            writeln!(self.out, "Deletion cancelled")?;
            return Ok(Flow::Continue);
        }

        contacts.delete(contact.id)?;
        writeln!(self.out, "Contact {} deleted successfully", contact.name)?;
        Ok(Flow::Continue)
    }

    /// Asks how to identify a contact and resolves the answer to an id.
    /// Email and name must match exactly one contact.
    fn prompt_target(&mut self, question: &str) -> Result<Option<ContactId>> {
        let Some(kind) = self.prompt(question)? else {
            return Ok(None);
        };
        let kind = kind.trim().to_ascii_lowercase();
        let field = match kind.as_str() {
            "id" => None,
            "phone" => Some(SearchField::Phone),
            "email" => Some(SearchField::Email),
            "name" => Some(SearchField::Name),
            _ => return Err(invalid_input("please choose 'id', 'phone', 'email' or 'name'")),
        };
        let Some(value) = self.prompt(&format!("Enter {kind}: "))? else {
            return Ok(None);
        };
        let Some(field) = field else {
            return parse_contact_id(&value).map(Some);
        };

        let mut matches = self.ctx.store.contacts().search(field, &value)?;
        match matches.len() {
            0 => Err(not_found(format!(
                "no contact found with {field}: {}",
                value.trim()
            ))),
            1 => Ok(matches.pop().map(|contact| contact.id)),
            n => Err(invalid_input(format!(
                "{n} contacts match {field}: {}; choose by id or phone",
                value.trim()
            ))),
        }
    }

    /// Prints `question` and reads one line. `None` means input is exhausted.
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{question}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
