//! Bundled scaffold templates and `{{variable}}` substitution.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VARIABLE: Regex = Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap();
}

/// A generated file rendered from a bundled template.
#[derive(Debug, Clone, Copy)]
pub struct ScaffoldFile {
    /// Path relative to the output directory
    pub path: &'static str,
    pub template: &'static str,
}

/// Every templated file of a generated application.
pub const SCAFFOLD: &[ScaffoldFile] = &[
    ScaffoldFile {
        path: "frontend/package.json",
        template: include_str!("../templates/package.json.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/index.html",
        template: include_str!("../templates/index.html.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/vite.config.js",
        template: include_str!("../templates/vite.config.js.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/src/main.jsx",
        template: include_str!("../templates/main.jsx.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/src/index.css",
        template: include_str!("../templates/index.css.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/src/App.jsx",
        template: include_str!("../templates/App.jsx.tmpl"),
    },
    ScaffoldFile {
        path: "frontend/src/components/Navigation.jsx",
        template: include_str!("../templates/Navigation.jsx.tmpl"),
    },
    ScaffoldFile {
        path: "backend/package.json",
        template: include_str!("../templates/backend_package.json.tmpl"),
    },
    ScaffoldFile {
        path: "backend/server.js",
        template: include_str!("../templates/server.js.tmpl"),
    },
    ScaffoldFile {
        path: "Dockerfile",
        template: include_str!("../templates/Dockerfile.tmpl"),
    },
    ScaffoldFile {
        path: "docker-compose.yml",
        template: include_str!("../templates/docker-compose.yml.tmpl"),
    },
];

/// Replace `{{name}}` placeholders. Unknown names are left as they are.
pub fn render_template(content: &str, variables: &HashMap<String, String>) -> String {
    VARIABLE
        .replace_all(content, |caps: &regex::Captures| {
            let name = &caps[1];
            variables
                .get(name)
                .cloned()
                .unwrap_or_else(|| format!("{{{{{}}}}}", name))
        })
        .to_string()
}

/// Escape text for an HTML text node or attribute.
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("app_slug".to_string(), "shop".to_string());
        assert_eq!(
            render_template("name: {{app_slug}}, port: {{api_port}}", &vars),
            "name: shop, port: {{api_port}}"
        );
        assert_eq!(render_template("{ a } ${PORT}", &vars), "{ a } ${PORT}");
    }

    #[test]
    fn test_templates_only_use_known_variables() {
        let known = [
            "app_slug",
            "title",
            "api_port",
            "page_imports",
            "routes",
            "nav_links",
            "pages_json",
        ];
        for file in SCAFFOLD {
            for caps in VARIABLE.captures_iter(file.template) {
                assert!(known.contains(&&caps[1]), "{} uses {}", file.path, &caps[1]);
            }
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
    }
}
