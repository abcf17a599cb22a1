//! Fixed files of the generated React project
//!
//! The auth scaffold and the Vite/TypeScript project files. Templates are
//! embedded at compile time; only `App.tsx` and the style entry point depend on
//! the job's pages and stylesheets.

use serde_json::json;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{ConversionError, ConversionResult};
use crate::models::{ConvertedPage, RESERVED_LOGIN_COMPONENT};

const SUPABASE_CLIENT_TS: &str = include_str!("../../templates/supabase_client.ts");
const AUTH_CONTEXT_TSX: &str = include_str!("../../templates/AuthContext.tsx");
const LOGIN_TSX: &str = include_str!("../../templates/Login.tsx");
const VITE_CONFIG_TS: &str = include_str!("../../templates/vite.config.ts");
const VITE_ENV_D_TS: &str = include_str!("../../templates/vite-env.d.ts");
const INDEX_HTML: &str = include_str!("../../templates/index.html");
const MAIN_TSX: &str = include_str!("../../templates/main.tsx");
const ENV_EXAMPLE: &str = include_str!("../../templates/env.example");
const README_MD: &str = include_str!("../../templates/README.md");

/// Route served by the login view
pub const LOGIN_ROUTE: &str = "/login";

/// Style entry point imported by `main.tsx`
pub const STYLE_ENTRY: &str = "index.css";

async fn write(output_dir: &Path, relative: &str, contents: impl AsRef<[u8]>) -> ConversionResult<()> {
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(ConversionError::fs(parent))?;
    }
    fs::write(&path, contents)
        .await
        .map_err(ConversionError::fs(&path))?;
    debug!("Wrote {}", relative);
    Ok(())
}

fn pretty_json(value: &serde_json::Value) -> String {
    // Serializing a Value built from literals cannot fail
    let mut text = serde_json::to_string_pretty(value).unwrap_or_default();
    text.push('\n');
    text
}

pub fn package_json() -> String {
    pretty_json(&json!({
        "name": "converted-react-app",
        "private": true,
        "version": "1.0.0",
        "type": "module",
        "scripts": {
            "dev": "vite",
            "build": "tsc && vite build",
            "preview": "vite preview"
        },
        "dependencies": {
            "@supabase/supabase-js": "^2.39.3",
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "react-router-dom": "^6.8.1"
        },
        "devDependencies": {
            "@types/react": "^18.2.55",
            "@types/react-dom": "^18.2.19",
            "@vitejs/plugin-react": "^4.2.1",
            "typescript": "^5.2.2",
            "vite": "^5.1.0"
        }
    }))
}

pub fn tsconfig_json() -> String {
    pretty_json(&json!({
        "compilerOptions": {
            "target": "ES2020",
            "useDefineForClassFields": true,
            "lib": ["ES2020", "DOM", "DOM.Iterable"],
            "module": "ESNext",
            "skipLibCheck": true,
            "moduleResolution": "bundler",
            "allowImportingTsExtensions": true,
            "resolveJsonModule": true,
            "isolatedModules": true,
            "noEmit": true,
            "jsx": "react-jsx",
            "strict": true,
            "noUnusedLocals": true,
            "noUnusedParameters": true,
            "noFallthroughCasesInSwitch": true
        },
        "include": ["src"],
        "references": [{ "path": "./tsconfig.node.json" }]
    }))
}

pub fn tsconfig_node_json() -> String {
    pretty_json(&json!({
        "compilerOptions": {
            "composite": true,
            "skipLibCheck": true,
            "module": "ESNext",
            "moduleResolution": "bundler",
            "allowSyntheticDefaultImports": true
        },
        "include": ["vite.config.ts"]
    }))
}

/// Router component: one route per converted page plus the login route,
/// unless a page already owns `/login`
pub fn app_tsx(pages: &[ConvertedPage]) -> String {
    let login_routed = !pages.iter().any(|p| p.route == LOGIN_ROUTE);

    let mut imports = vec![
        "import { BrowserRouter as Router, Routes, Route } from 'react-router-dom'".to_string(),
        "import { AuthProvider } from './context/AuthContext'".to_string(),
    ];
    if login_routed {
        imports.push(format!(
            "import {0} from './pages/{0}'",
            RESERVED_LOGIN_COMPONENT
        ));
    }
    imports.extend(
        pages
            .iter()
            .map(|p| format!("import {0} from './pages/{0}'", p.component)),
    );

    let mut routes = Vec::new();
    if login_routed {
        routes.push(format!(
            "          <Route path=\"{}\" element={{<{} />}} />",
            LOGIN_ROUTE, RESERVED_LOGIN_COMPONENT
        ));
    }
    routes.extend(pages.iter().map(|p| {
        format!(
            "          <Route path={} element={{<{} />}} />",
            serde_json::to_string(&p.route).unwrap_or_else(|_| "\"/\"".to_string()),
            p.component
        )
    }));

    let imports = imports.join("\n");
    let routes = routes.join("\n");

    format!(
        "{imports}\n\
         \n\
         function App() {{\n\
         \x20 return (\n\
         \x20   <AuthProvider>\n\
         \x20     <Router>\n\
         \x20       <Routes>\n\
         {routes}\n\
         \x20       </Routes>\n\
         \x20     </Router>\n\
         \x20   </AuthProvider>\n\
         \x20 )\n\
         }}\n\
         \n\
         export default App\n"
    )
}

fn is_plain_css(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

/// Style entry point pulling in every relocated plain stylesheet
///
/// Sass sources cannot be `@import`ed from plain CSS without a preprocessor, so
/// they are listed in a comment for manual wiring instead.
pub fn index_css(styles: &[String]) -> String {
    let mut css = String::from("/* Entry stylesheet; imports the original site's styles */\n");
    let (plain, preprocessed): (Vec<&String>, Vec<&String>) =
        styles.iter().partition(|s| is_plain_css(s));

    for style in plain {
        css.push_str(&format!("@import './{}';\n", style));
    }
    if !preprocessed.is_empty() {
        warn!(
            files = preprocessed.len(),
            "Sass stylesheets copied but not imported; they need a preprocessor"
        );
        css.push_str("/* Not imported (requires sass):\n");
        for style in preprocessed {
            css.push_str(&format!(" * ./{}\n", style));
        }
        css.push_str(" */\n");
    }
    css
}

/// `src/supabase/client.ts`, `src/context/AuthContext.tsx`, `src/pages/Login.tsx`
pub async fn emit_auth_scaffold(output_dir: &Path) -> ConversionResult<()> {
    write(output_dir, "src/supabase/client.ts", SUPABASE_CLIENT_TS).await?;
    write(output_dir, "src/context/AuthContext.tsx", AUTH_CONTEXT_TSX).await?;
    write(output_dir, "src/pages/Login.tsx", LOGIN_TSX).await?;
    Ok(())
}

/// Project configuration, entry points and router
///
/// `styles` are the file names present in `src/styles`.
pub async fn emit_project_files(
    output_dir: &Path,
    pages: &[ConvertedPage],
    styles: &[String],
) -> ConversionResult<()> {
    write(output_dir, "package.json", package_json()).await?;
    write(output_dir, "vite.config.ts", VITE_CONFIG_TS).await?;
    write(output_dir, "tsconfig.json", tsconfig_json()).await?;
    write(output_dir, "tsconfig.node.json", tsconfig_node_json()).await?;
    write(output_dir, ".env.example", ENV_EXAMPLE).await?;
    write(output_dir, "README.md", README_MD).await?;
    write(output_dir, "index.html", INDEX_HTML).await?;
    write(output_dir, "src/vite-env.d.ts", VITE_ENV_D_TS).await?;
    write(output_dir, "src/main.tsx", MAIN_TSX).await?;
    write(output_dir, "src/App.tsx", app_tsx(pages)).await?;

    if !styles.iter().any(|s| s == STYLE_ENTRY) {
        let path = format!("src/styles/{}", STYLE_ENTRY);
        write(output_dir, &path, index_css(styles)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageRecord;
    use std::path::PathBuf;

    fn converted(component: &str, route: &str) -> ConvertedPage {
        ConvertedPage {
            component: component.to_string(),
            route: route.to_string(),
            source: PathBuf::from(format!("/site/{}.html", component)),
        }
    }

    #[test]
    fn test_app_routes_pages_and_login() {
        let app = app_tsx(&[converted("Index", "/"), converted("About", "/about")]);

        assert!(app.contains("import Login from './pages/Login'"));
        assert!(app.contains("import Index from './pages/Index'"));
        assert!(app.contains("import About from './pages/About'"));
        assert!(app.contains("<Route path=\"/login\" element={<Login />} />"));
        assert!(app.contains("<Route path=\"/\" element={<Index />} />"));
        assert!(app.contains("<Route path=\"/about\" element={<About />} />"));
        assert!(app.contains("<AuthProvider>"));
        assert!(!app.contains("import React"));
    }

    #[test]
    fn test_page_owning_login_route_suppresses_scaffold_route() {
        let app = app_tsx(&[converted("LoginPage", "/login")]);

        assert!(!app.contains("import Login from"));
        assert!(app.contains("<Route path=\"/login\" element={<LoginPage />} />"));
        assert_eq!(app.matches("path=\"/login\"").count(), 1);
    }

    #[test]
    fn test_page_named_app_does_not_clash_with_root_component() {
        let page = PageRecord::new(PathBuf::from("/site/app.html"), "app");
        let app = app_tsx(&[ConvertedPage {
            component: page.component_name(),
            route: page.route(),
            source: page.path.clone(),
        }]);

        assert!(app.contains("import AppPage from './pages/AppPage'"));
        assert!(app.contains("<Route path=\"/app\" element={<AppPage />} />"));
        assert!(!app.contains("import App from"));
        assert_eq!(app.matches("function App()").count(), 1);
    }

    #[test]
    fn test_index_css_imports_only_plain_css() {
        let css = index_css(&[
            "style.css".to_string(),
            "theme.scss".to_string(),
            "print.CSS".to_string(),
        ]);
        assert!(css.contains("@import './style.css';"));
        assert!(css.contains("@import './print.CSS';"));
        assert!(!css.contains("@import './theme.scss';"));
        assert!(css.contains(" * ./theme.scss"));
    }

    #[test]
    fn test_package_json_declares_runtime_dependencies() {
        let value: serde_json::Value = serde_json::from_str(&package_json()).unwrap();
        assert_eq!(value["scripts"]["dev"], "vite");
        assert!(value["dependencies"]["react-router-dom"].is_string());
        assert!(value["dependencies"]["@supabase/supabase-js"].is_string());
        assert!(value["devDependencies"]["vite"].is_string());
    }

    #[tokio::test]
    async fn test_emits_auth_scaffold() {
        let temp = tempfile::tempdir().unwrap();
        emit_auth_scaffold(temp.path()).await.unwrap();

        let client = std::fs::read_to_string(temp.path().join("src/supabase/client.ts")).unwrap();
        assert!(client.contains("VITE_SUPABASE_URL"));
        let auth = std::fs::read_to_string(temp.path().join("src/context/AuthContext.tsx")).unwrap();
        assert!(auth.contains("signInWithPassword"));
        assert!(auth.contains("onAuthStateChange"));
        assert!(temp.path().join("src/pages/Login.tsx").is_file());
    }

    #[tokio::test]
    async fn test_emits_project_files() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path();
        emit_project_files(out, &[converted("Index", "/")], &["style.css".to_string()])
            .await
            .unwrap();

        for file in [
            "package.json",
            "vite.config.ts",
            "tsconfig.json",
            "tsconfig.node.json",
            ".env.example",
            "README.md",
            "index.html",
            "src/vite-env.d.ts",
            "src/main.tsx",
            "src/App.tsx",
        ] {
            assert!(out.join(file).is_file(), "missing {}", file);
        }
        let css = std::fs::read_to_string(out.join("src/styles/index.css")).unwrap();
        assert!(css.contains("@import './style.css';"));
    }

    #[tokio::test]
    async fn test_existing_index_css_is_kept() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path();
        std::fs::create_dir_all(out.join("src/styles")).unwrap();
        std::fs::write(out.join("src/styles/index.css"), "body{}").unwrap();

        emit_project_files(out, &[], &["index.css".to_string()])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("src/styles/index.css")).unwrap(),
            "body{}"
        );
    }
}
