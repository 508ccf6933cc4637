use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use spinoff::{spinners, Color, Spinner};

use crate::error::ModelKeyError;
use crate::form::{EngineError, FormEngine};
use crate::locale::Locale;
use crate::registry::{ProviderKey, ProviderRegistry};
use crate::store::{Ack, CredentialSink};
use crate::view::{pick, selector_entries, FieldKind, FieldView, ModalView};

/// Interactive credential form for one provider.
pub struct ConfigureCommand<'a> {
    registry: &'a ProviderRegistry,
    locale: Locale,
    sink: &'a dyn CredentialSink,
}

impl<'a> ConfigureCommand<'a> {
    pub fn new(registry: &'a ProviderRegistry, locale: Locale, sink: &'a dyn CredentialSink) -> Self {
        Self {
            registry,
            locale,
            sink,
        }
    }

    /// Runs the configuration wizard.
    ///
    /// This process:
    /// 1. Prompts for a provider unless one was given
    /// 2. Asks for every field the provider declares
    /// 3. Re-asks only the fields that failed validation
    /// 4. Submits, offering a retry with the typed values kept if the sink rejects them
    pub async fn execute(&self, provider: Option<ProviderKey>) -> Result<(), ModelKeyError> {
        println!("\n  \x1b[1;36mModel Provider Configuration\x1b[0m\n");

        let key = match provider {
            Some(key) => key,
            None => match self.select_provider()? {
                Some(key) => key,
                None => return Ok(()),
            },
        };

        let descriptor = self.registry.get(key)?;
        let modal = ModalView::project(descriptor, self.locale);
        println!("\n  \x1b[1m{}\x1b[0m", modal.title);
        println!("  \x1b[2m{} → {}\x1b[0m\n", modal.link.label, modal.link.href);

        let mut engine = FormEngine::new(descriptor);
        match self.run_form(&mut engine, &modal).await? {
            Some(ack) => println!(
                "\n  \x1b[1;32m✓\x1b[0m Credentials saved to \x1b[2m{}\x1b[0m\n",
                ack.saved_to
            ),
            None => println!("\n  \x1b[2mCancelled, nothing was saved.\x1b[0m\n"),
        }
        Ok(())
    }

    /// Prompts the user to select a provider from the registry.
    fn select_provider(&self) -> Result<Option<ProviderKey>, ModelKeyError> {
        let entries = selector_entries(self.registry, self.locale);

        let choice = Select::new("Select a model provider:", entries.clone())
            .with_help_message("↑↓ to move, enter to select, type to filter")
            .raw_prompt();

        Ok(answer(choice)?.and_then(|choice| pick(&entries, choice.index)))
    }

    async fn run_form(
        &self,
        engine: &mut FormEngine<'_>,
        modal: &ModalView,
    ) -> Result<Option<Ack>, ModelKeyError> {
        let mut to_ask: Vec<&FieldView> = modal.fields.iter().collect();

        loop {
            for field in &to_ask {
                let current = engine.value(field.key).map(str::to_string);
                match Self::prompt_field(field, current)? {
                    Some(value) => engine.set_value(field.key, value)?,
                    None => {
                        engine.cancel();
                        return Ok(None);
                    }
                }
            }

            match engine.validate() {
                Ok(()) => {}
                Err(EngineError::Invalid(err)) => {
                    for (key, issue) in &err.issues {
                        let label = modal.field(key).map(|f| f.label).unwrap_or(key.as_str());
                        eprintln!("  \x1b[91m✗\x1b[0m {}: {}", label, issue);
                    }
                    to_ask = modal
                        .fields
                        .iter()
                        .filter(|field| err.issue(field.key).is_some())
                        .collect();
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let mut spinner = Spinner::new(
                spinners::Dots,
                format!("Saving {} credentials...", modal.title),
                Color::Blue,
            );
            match engine.submit(self.sink).await {
                Ok(ack) => {
                    spinner.success("Credentials accepted");
                    return Ok(Some(ack));
                }
                Err(EngineError::Submit(err)) => {
                    spinner.fail(&err.message);
                    let retry = answer(
                        Confirm::new("Edit the values and try again?")
                            .with_default(true)
                            .prompt(),
                    )?;
                    if retry != Some(true) {
                        engine.cancel();
                        return Ok(None);
                    }
                    to_ask = modal.fields.iter().collect();
                }
                Err(e) => {
                    spinner.clear();
                    return Err(e.into());
                }
            }
        }
    }

    /// Asks for one field. Secret fields are masked and keep their current
    /// value when left empty.
    fn prompt_field(
        field: &FieldView,
        current: Option<String>,
    ) -> Result<Option<String>, ModelKeyError> {
        let message = if field.required {
            format!("{}:", field.label)
        } else {
            format!("{} (optional):", field.label)
        };

        match &field.kind {
            FieldKind::Secret => {
                let kept = kept_secret(current);
                let value = answer(
                    Password::new(&message)
                        .without_confirmation()
                        .with_display_mode(PasswordDisplayMode::Masked)
                        .with_help_message(secret_help(field, kept.is_some()))
                        .prompt(),
                )?;
                Ok(value.map(|value| match kept {
                    Some(previous) if value.is_empty() => previous,
                    _ => value,
                }))
            }
            FieldKind::Select { options } => {
                let selected = current
                    .as_deref()
                    .or(field.default_value)
                    .and_then(|value| options.iter().position(|option| option.value == value))
                    .unwrap_or(0);
                let choice = answer(
                    Select::new(&message, options.clone())
                        .with_starting_cursor(selected)
                        .with_help_message(field.placeholder)
                        .prompt(),
                )?;
                Ok(choice.map(|option| option.value.to_string()))
            }
            FieldKind::Text | FieldKind::Url => {
                let initial = current.as_deref().unwrap_or_default();
                answer(
                    Text::new(&message)
                        .with_placeholder(field.placeholder)
                        .with_initial_value(initial)
                        .prompt(),
                )
            }
        }
    }
}

/// The earlier secret worth keeping on a re-prompt; blank ones are not.
fn kept_secret(current: Option<String>) -> Option<String> {
    current.filter(|value| !value.trim().is_empty())
}

fn secret_help(field: &FieldView, has_value: bool) -> &'static str {
    if has_value {
        "Leave empty to keep the value entered before"
    } else {
        field.placeholder
    }
}

/// `None` when the user pressed Esc or Ctrl-C.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>, ModelKeyError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(ModelKeyError::ConfigurationError(e.to_string())),
    }
}
