//! Operator command grammar.
//!
//! ```text
//! (empty)            toggle the main window
//! list               toggle the furnishing list
//! <x> <y> <z>        move the selected item
//! <x> <y> <z> <deg>  move, then rotate
//! ```

use crate::error::EditError;

/// Shape of a command before any number is parsed.
///
/// Numbers stay as text so the write gate can be checked before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandForm {
    ToggleUi,
    ToggleList,
    Place {
        coordinates: [String; 3],
        rotation: Option<String>,
    },
}

impl CommandForm {
    pub fn classify(args: &str) -> Result<Self, EditError> {
        let args = args.trim().to_lowercase();
        let tokens: Vec<&str> = args.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Ok(Self::ToggleUi),
            ["list"] => Ok(Self::ToggleList),
            [x, y, z] => Ok(Self::Place {
                coordinates: [x.to_string(), y.to_string(), z.to_string()],
                rotation: None,
            }),
            [x, y, z, rotation] => Ok(Self::Place {
                coordinates: [x.to_string(), y.to_string(), z.to_string()],
                rotation: Some(rotation.to_string()),
            }),
            _ => Err(EditError::Usage(args.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toggles_ui() {
        assert_eq!(CommandForm::classify("").unwrap(), CommandForm::ToggleUi);
        assert_eq!(CommandForm::classify("   ").unwrap(), CommandForm::ToggleUi);
    }

    #[test]
    fn test_list_is_case_insensitive() {
        assert_eq!(CommandForm::classify("LIST").unwrap(), CommandForm::ToggleList);
        assert_eq!(CommandForm::classify(" list ").unwrap(), CommandForm::ToggleList);
    }

    #[test]
    fn test_place_forms() {
        assert_eq!(
            CommandForm::classify("1.5  2.0\t3.25").unwrap(),
            CommandForm::Place {
                coordinates: ["1.5".into(), "2.0".into(), "3.25".into()],
                rotation: None,
            }
        );
        assert_eq!(
            CommandForm::classify("1 2 3 90").unwrap(),
            CommandForm::Place {
                coordinates: ["1".into(), "2".into(), "3".into()],
                rotation: Some("90".into()),
            }
        );
    }

    #[test]
    fn test_numbers_are_not_parsed_yet() {
        assert!(matches!(
            CommandForm::classify("abc 1 2").unwrap(),
            CommandForm::Place { .. }
        ));
    }

    #[test]
    fn test_other_shapes_are_usage_errors() {
        for args in ["help", "1 2", "1 2 3 4 5", "list now"] {
            assert!(
                matches!(CommandForm::classify(args), Err(EditError::Usage(_))),
                "{args:?}"
            );
        }
    }
}
