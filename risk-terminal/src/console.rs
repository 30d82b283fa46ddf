use risk_flow::{Domain, FormState, RiskTier, SubmissionState, fields};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Fields,
    Set { name: String, value: String },
    Clear { name: String },
    Show,
    Submit,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  fields              list the measurements and their allowed values
  set <name> <value>  set a field (surrounding spaces are dropped)
  clear <name>        empty a field
  show                print the current form and last outcome
  submit              validate and send the form for a risk prediction
  help                this text
  quit                leave";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    match verb {
        "fields" => Ok(Command::Fields),
        "show" => Ok(Command::Show),
        "submit" => Ok(Command::Submit),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "set" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set <name> <value>".to_string())?;
            Ok(Command::Set {
                name: name.to_string(),
                value: value.trim_start().to_string(),
            })
        }
        "clear" if !rest.is_empty() => Ok(Command::Clear {
            name: rest.to_string(),
        }),
        "clear" => Err("usage: clear <name>".to_string()),
        "" => Err(String::new()),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

pub fn render_fields() -> String {
    fields()
        .iter()
        .map(|f| {
            let domain = match f.domain {
                Domain::Range { min, max, .. } => format!("{} to {}", min, max),
                Domain::Choices { options } => options
                    .iter()
                    .map(|c| format!("{}={}", c.code, c.label))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            let marker = if f.required { "*" } else { " " };
            format!("{}{:<9} {:<26} {}", marker, f.name, f.label, domain)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_form(form: &FormState) -> String {
    fields()
        .iter()
        .map(|f| {
            let value = form.get(f.name).unwrap_or_default();
            let shown = match f.choice_label(value) {
                Some(label) => format!("{} ({})", value, label),
                None if value.is_empty() => "-".to_string(),
                None => value.to_string(),
            };
            let hint = if f.admits(value) { "" } else { "  [outside usual range]" };
            format!("  {:<9} {}{}", f.name, shown, hint)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "No prediction yet.".to_string(),
        SubmissionState::Submitting => "Analyzing...".to_string(),
        SubmissionState::Succeeded(Some(result)) if !result.is_empty() => {
            let tier = match risk_flow::classify(result) {
                RiskTier::High => "HIGH",
                RiskTier::Medium => "MEDIUM",
                RiskTier::Low => "LOW",
            };
            format!("Risk assessment: {} [{}]", result, tier)
        }
        SubmissionState::Succeeded(_) => {
            "The prediction service answered without a result.".to_string()
        }
        SubmissionState::Failed(message) => format!("Error: {}", message),
    }
}
