//! Document shell streamed ahead of page sections.

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    /// Page title.
    pub title: Option<String>,
    /// Meta tags as name/content pairs.
    pub meta: Vec<(String, String)>,
    /// Raw tags (stylesheet links, preloads).
    pub links: Vec<String>,
    /// Inline scripts.
    pub scripts: Vec<String>,
}

impl HeadContent {
    /// Create new head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a stylesheet link.
    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.links.push(format!(
            r#"<link rel="stylesheet" href="{}">"#,
            escape_attr(href)
        ));
        self
    }

    /// Add an inline script.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.scripts.push(script.into());
        self
    }

    /// Render head content to HTML.
    pub fn render(&self) -> String {
        let mut html = String::from("<meta charset=\"utf-8\">\n");

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_text(title)));
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                r#"<meta name="{}" content="{}">"#,
                escape_attr(name),
                escape_attr(content)
            ));
            html.push('\n');
        }

        for link in &self.links {
            html.push_str(link);
            html.push('\n');
        }

        for script in &self.scripts {
            html.push_str(&format!("<script>{}</script>\n", script));
        }

        html
    }
}

/// Document shell wrapping the streamed sections.
#[derive(Debug, Clone)]
pub struct Shell {
    /// Document language.
    pub lang: String,
    /// Head content.
    pub head: HeadContent,
    /// Classes on the body element (e.g., style scope class names).
    pub body_class: Option<String>,
    /// HTML after the body tag, before sections.
    pub body_start: String,
    /// HTML after sections, before the body closes.
    pub body_end: String,
}

impl Shell {
    /// Create a new shell with basic structure.
    pub fn new(head: HeadContent) -> Self {
        Self {
            lang: "en".to_string(),
            head,
            body_class: None,
            body_start: "<main>\n".to_string(),
            body_end: "</main>\n".to_string(),
        }
    }

    /// Set the document language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set classes on the body element.
    pub fn with_body_class(mut self, class: impl Into<String>) -> Self {
        self.body_class = Some(class.into());
        self
    }

    /// Set custom HTML opening the body content.
    pub fn with_body_start(mut self, html: impl Into<String>) -> Self {
        self.body_start = html.into();
        self
    }

    /// Set custom HTML closing the body content.
    pub fn with_body_end(mut self, html: impl Into<String>) -> Self {
        self.body_end = html.into();
        self
    }

    /// Render the opening part of the shell (before sections).
    pub fn render_opening(&self) -> String {
        let mut html = format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
            escape_attr(&self.lang)
        );
        html.push_str(&self.head.render());
        html.push_str("</head>\n");

        match &self.body_class {
            Some(class) => html.push_str(&format!("<body class=\"{}\">\n", escape_attr(class))),
            None => html.push_str("<body>\n"),
        }
        html.push_str(&self.body_start);

        html
    }

    /// Render the closing part of the shell (after sections).
    pub fn render_closing(&self) -> String {
        format!("{}</body>\n</html>", self.body_end)
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_render() {
        let head = HeadContent::new("Shoes & Socks")
            .with_meta("description", "Best \"shoes\"")
            .with_stylesheet("/app.css")
            .with_script("window.__ready=true");

        let html = head.render();
        assert!(html.contains("<title>Shoes &amp; Socks</title>"));
        assert!(html.contains(r#"<meta name="description" content="Best &quot;shoes&quot;">"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/app.css">"#));
        assert!(html.contains("<script>window.__ready=true</script>"));
    }

    #[test]
    fn test_shell_opening_and_closing() {
        let shell = Shell::new(HeadContent::new("Home"))
            .with_lang("de")
            .with_body_class("css-page");

        let opening = shell.render_opening();
        assert!(opening.starts_with("<!DOCTYPE html>\n<html lang=\"de\">"));
        assert!(opening.contains("<body class=\"css-page\">"));
        assert!(opening.ends_with("<main>\n"));
        assert_eq!(shell.render_closing(), "</main>\n</body>\n</html>");
    }

    #[test]
    fn test_custom_body_wrappers() {
        let shell = Shell::new(HeadContent::default())
            .with_body_start("<div id=\"root\">")
            .with_body_end("</div>");

        assert!(shell.render_opening().ends_with("<body>\n<div id=\"root\">"));
        assert_eq!(shell.render_closing(), "</div></body>\n</html>");
    }
}
