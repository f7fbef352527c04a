//! Line commands typed at the hotel page prompt.

use shared::domain::HotelId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    /// Commit a new city filter value.
    City(String),
    List,
    SetName(String),
    SetLocalCode(String),
    SetHotelCity(String),
    ShowForm,
    Save,
    Edit(HotelId),
    Delete(HotelId),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  city <name>         set the city filter and load its hotels
  list                show the rendered hotel list
  name <value>        set the form's hotel name
  code <value>        set the form's local code
  hotel-city <code>   set the form's city code
  form                show the form
  save                submit the form (create or update)
  edit <id>           load a listed hotel into the form
  delete <id>         delete a listed hotel
  help | quit";

pub fn parse_command(line: &str) -> Result<PageCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "city" => PageCommand::City(rest.to_string()),
        "list" | "ls" => PageCommand::List,
        "name" => PageCommand::SetName(rest.to_string()),
        "code" => PageCommand::SetLocalCode(rest.to_string()),
        "hotel-city" => PageCommand::SetHotelCity(rest.to_string()),
        "form" => PageCommand::ShowForm,
        "save" => PageCommand::Save,
        "edit" => PageCommand::Edit(parse_hotel_id(rest)?),
        "delete" | "rm" => PageCommand::Delete(parse_hotel_id(rest)?),
        "help" | "?" => PageCommand::Help,
        "quit" | "exit" => PageCommand::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(command)
}

fn parse_hotel_id(raw: &str) -> Result<HotelId, String> {
    raw.parse::<i64>()
        .map(HotelId)
        .map_err(|_| format!("expected a hotel id, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_keeps_inner_spaces() {
        assert_eq!(
            parse_command("city  San José "),
            Ok(PageCommand::City("San José".to_string()))
        );
    }

    #[test]
    fn bare_city_commits_empty_filter() {
        assert_eq!(parse_command("city"), Ok(PageCommand::City(String::new())));
    }

    #[test]
    fn parses_ids_for_edit_and_delete() {
        assert_eq!(parse_command("edit 4"), Ok(PageCommand::Edit(HotelId(4))));
        assert_eq!(parse_command("rm 12"), Ok(PageCommand::Delete(HotelId(12))));
        assert!(parse_command("delete x").is_err());
    }

    #[test]
    fn rejects_unknown_words() {
        assert!(parse_command("book 3").is_err());
        assert!(parse_command("   ").is_err());
    }
}
