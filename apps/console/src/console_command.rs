use marketdesk_core::{AppError, AppResult, Language, RecordId};

/// Collections the console can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListTarget {
    Admins,
    Categories,
    Plans,
    Subscriptions,
    Requests,
}

/// One console invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleCommand {
    List {
        target: ListTarget,
        search: Option<String>,
    },
    Areas {
        governorate_id: RecordId,
    },
    Approve {
        id: RecordId,
    },
    Reject {
        id: RecordId,
        reason: String,
    },
    DeleteCategory {
        id: RecordId,
    },
    Language(Language),
}

pub(crate) const USAGE: &str = "usage: marketdesk-console <admins|categories|plans|subscriptions|requests> [search]\n       marketdesk-console areas <governorate_id>\n       marketdesk-console approve <id>\n       marketdesk-console reject <id> <reason>\n       marketdesk-console delete-category <id>\n       marketdesk-console language <en|ar>";

impl ConsoleCommand {
    pub(crate) fn parse(args: &[String]) -> AppResult<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Err(AppError::Validation(USAGE.to_owned()));
        };

        let target = match name.as_str() {
            "admins" => Some(ListTarget::Admins),
            "categories" => Some(ListTarget::Categories),
            "plans" => Some(ListTarget::Plans),
            "subscriptions" => Some(ListTarget::Subscriptions),
            "requests" => Some(ListTarget::Requests),
            _ => None,
        };
        if let Some(target) = target {
            return Ok(Self::List {
                target,
                search: joined(rest),
            });
        }

        match name.as_str() {
            "areas" => Ok(Self::Areas {
                governorate_id: record_id(rest.first(), "governorate_id")?,
            }),
            "approve" => Ok(Self::Approve {
                id: record_id(rest.first(), "id")?,
            }),
            "reject" => {
                let id = record_id(rest.first(), "id")?;
                let reason = joined(rest.get(1..).unwrap_or_default()).ok_or_else(|| {
                    AppError::Validation("reject requires a reason".to_owned())
                })?;
                Ok(Self::Reject { id, reason })
            }
            "delete-category" => Ok(Self::DeleteCategory {
                id: record_id(rest.first(), "id")?,
            }),
            "language" => {
                let value = rest
                    .first()
                    .ok_or_else(|| AppError::Validation("language requires en or ar".to_owned()))?;
                Ok(Self::Language(value.parse()?))
            }
            other => Err(AppError::Validation(format!(
                "unknown command '{other}'\n{USAGE}"
            ))),
        }
    }
}

fn joined(words: &[String]) -> Option<String> {
    let text = words.join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

fn record_id(value: Option<&String>, name: &str) -> AppResult<RecordId> {
    let value = value.ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    let id = value
        .parse::<i64>()
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))?;
    if id <= 0 {
        return Err(AppError::Validation(format!(
            "{name} must be a positive integer"
        )));
    }

    Ok(RecordId::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppResult<ConsoleCommand> {
        let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
        ConsoleCommand::parse(&args)
    }

    #[test]
    fn list_commands_join_search_words() {
        assert_eq!(
            parse(&["categories", "sna", "cks"]),
            Ok(ConsoleCommand::List {
                target: ListTarget::Categories,
                search: Some("sna cks".to_owned()),
            })
        );
        assert_eq!(
            parse(&["requests"]),
            Ok(ConsoleCommand::List {
                target: ListTarget::Requests,
                search: None,
            })
        );
    }

    #[test]
    fn reject_needs_id_and_reason() {
        assert_eq!(
            parse(&["reject", "4", "proof", "is", "unreadable"]),
            Ok(ConsoleCommand::Reject {
                id: RecordId::new(4),
                reason: "proof is unreadable".to_owned(),
            })
        );
        assert!(matches!(
            parse(&["reject", "4"]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert!(matches!(
            parse(&["approve", "abc"]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse(&["delete-category", "-3"]),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            parse(&["areas", "7"]),
            Ok(ConsoleCommand::Areas {
                governorate_id: RecordId::new(7),
            })
        );
    }

    #[test]
    fn language_and_unknown_commands() {
        assert_eq!(
            parse(&["language", "ar"]),
            Ok(ConsoleCommand::Language(Language::Ar))
        );
        assert!(matches!(parse(&["language", "fr"]), Err(AppError::Validation(_))));
        assert!(matches!(parse(&["dance"]), Err(AppError::Validation(_))));
        assert!(matches!(parse(&[]), Err(AppError::Validation(_))));
    }
}
