//! Markdown rendering of an incoming attachment into an issue body.

use crate::types::Attachment;

/// Render the attachment text followed by a FIELDS/VALUES table, one row per
/// field in input order.
pub fn issue_body(attachment: &Attachment) -> String {
    let rows = attachment
        .fields
        .iter()
        .map(|field| format!("| {} | {} |", field.title, field.value))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\n\n{}. Refer to the table below for more information.\n\n| FIELDS | VALUES |\n| ----- | ----- |\n{rows}\n",
        attachment.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttachmentField;

    fn attachment(fields: &[(&str, &str)]) -> Attachment {
        Attachment {
            color: "#000".to_string(),
            pretext: "p".to_string(),
            title: "Need help".to_string(),
            text: "Cannot log in".to_string(),
            fields: fields
                .iter()
                .map(|(title, value)| AttachmentField {
                    title: title.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_field_exact_output() {
        let body = issue_body(&attachment(&[("User", "alice")]));
        assert_eq!(
            body,
            "\n\nCannot log in. Refer to the table below for more information.\n\n| FIELDS | VALUES |\n| ----- | ----- |\n| User | alice |\n"
        );
    }

    #[test]
    fn test_rows_in_input_order() {
        let body = issue_body(&attachment(&[
            ("User", "alice"),
            ("Team", "billing"),
            ("Severity", "high"),
        ]));

        let rows: Vec<&str> = body
            .lines()
            .skip_while(|line| !line.starts_with("| ----- "))
            .skip(1)
            .filter(|line| !line.is_empty())
            .collect();
        assert_eq!(
            rows,
            vec!["| User | alice |", "| Team | billing |", "| Severity | high |"]
        );
    }

    #[test]
    fn test_text_precedes_table() {
        let body = issue_body(&attachment(&[("User", "alice")]));
        let text_at = body.find("Cannot log in").unwrap();
        let table_at = body.find("| FIELDS | VALUES |").unwrap();
        assert!(text_at < table_at);
    }

    #[test]
    fn test_zero_fields_header_only() {
        let body = issue_body(&attachment(&[]));
        assert!(body.ends_with("| FIELDS | VALUES |\n| ----- | ----- |\n\n"));
        assert_eq!(body.matches("| ").count(), 4);
    }
}
