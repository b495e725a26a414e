use crate::domain::{SrimError, SrimResult};
use serde::Serialize;

/// Pretty JSON with a single trailing newline.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> SrimResult<String> {
    let mut rendered = serde_json::to_string_pretty(value).map_err(|error| {
        SrimError::io_system(
            "IO.JSON_RENDER",
            format!("failed to render JSON output: {error}"),
        )
    })?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::domain::FileKind;
    use crate::domain::Ion;

    #[test]
    fn rendering_is_deterministic_and_newline_terminated() {
        let ion = Ion::from_kev("He", 1.0);
        let first = render_json(&ion).expect("ion should render");
        let second = render_json(&ion).expect("ion should render");

        assert_eq!(first, second);
        assert!(first.ends_with("}\n"));
        assert!(first.contains("\"energyEv\": 1000.0"));
    }

    #[test]
    fn kinds_render_as_variant_names() {
        let rendered = render_json(&[FileKind::Vacancy]).expect("kinds should render");
        assert_eq!(rendered, "[\n  \"Vacancy\"\n]\n");
    }
}
