//! Text VDF loading. The grammar is handled by `keyvalues-parser`; this
//! module only converts its borrowed tree into our owned [`Vdf`].

use std::fs;
use std::path::Path;

use keyvalues_parser as kv;

use super::{Object, Value, Vdf};
use crate::SteamError;

/// Reads and parses a text VDF file.
pub fn load(path: &Path) -> Result<Vdf, SteamError> {
    let text = fs::read_to_string(path).map_err(|e| {
        SteamError::Io(format!("failed to read {}: {e}", path.display()))
    })?;
    parse(&text).map_err(|e| SteamError::Vdf(format!("{}: {e}", path.display())))
}

/// Parses text VDF. Keys come back sorted; Steam never relies on the
/// order of keys in its text files.
pub fn parse(text: &str) -> Result<Vdf, SteamError> {
    let parsed = kv::Vdf::parse(text).map_err(|e| SteamError::Vdf(e.to_string()))?;

    match convert_value(&parsed.value) {
        Value::Obj(root) => Ok(Vdf::new(parsed.key.to_string(), root)),
        _ => Err(SteamError::Vdf(format!(
            "root '{}' is not an object",
            parsed.key
        ))),
    }
}

fn convert_value(value: &kv::Value<'_>) -> Value {
    match value {
        kv::Value::Str(s) => Value::Str(s.to_string()),
        kv::Value::Obj(obj) => Value::Obj(convert_obj(obj)),
    }
}

fn convert_obj(obj: &kv::Obj<'_>) -> Object {
    let mut out = Object::new();
    for (key, values) in obj.iter() {
        for value in values {
            out.push(key.to_string(), convert_value(value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGINUSERS: &str = r#"
"users"
{
	"76561197960287930"
	{
		"AccountName"		"testuser"
		"PersonaName"		"Test User"
		"MostRecent"		"1"
	}
}
"#;

    #[test]
    fn parse_nested_objects() {
        let vdf = parse(LOGINUSERS).unwrap();
        assert_eq!(vdf.key, "users");
        let user = vdf.root.get_obj_ci("76561197960287930").unwrap();
        assert_eq!(user.get_str_ci("accountname"), Some("testuser"));
        assert_eq!(user.get_ci("MostRecent").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let vdf = parse("\"root\"\n{\n\"k\" \"a\"\n\"k\" \"b\"\n}\n").unwrap();
        let values: Vec<_> = vdf
            .root
            .iter()
            .filter(|(k, _)| *k == "k")
            .filter_map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn escaped_windows_paths() {
        let vdf = parse("\"libraryfolders\"\n{\n\"0\" { \"path\" \"C:\\\\Steam\" }\n}\n").unwrap();
        let path = vdf.root.get_path_ci(&["0", "path"]).and_then(Value::as_str);
        assert_eq!(path, Some("C:\\Steam"));
    }

    #[test]
    fn reject_malformed() {
        assert!(parse("\"root\" {").is_err());
    }

    #[test]
    fn load_missing_file() {
        let err = load(Path::new("/nonexistent/loginusers.vdf")).unwrap_err();
        assert!(matches!(err, SteamError::Io(_)));
    }
}
