use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use log::info;
use nestcss_lib::style::emit::wrap_block;
use nestcss_lib::{tree, variables, CompileOptions, StyleConfig};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const NESTCSS_INTRO: &str = r#"
     _  _         _    ___ ___ ___
    | \| |___ ___| |_ / __/ __/ __|
    | .` / -_|_-<|  _| (__\__ \__ \
    |_|\_\___/__/ \__|\___|___/___/

    nestcss - nested style trees in, plain CSS out
"#;

#[derive(Parser, Debug)]
#[command(name = "nestcss")]
#[command(about = "Compile nested JSON style trees to CSS")]
struct Args {
    /// Style tree files (JSON). Each one becomes `<out-dir>/<stem>.css`.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON configuration: mediaQueries, mediaPrefixes, auto, mediaSelectors.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Wrap each stylesheet in `@layer <stem>` and write a main file importing them.
    #[arg(long)]
    layers: bool,

    /// Name of the main stylesheet written with `--layers`.
    #[arg(long, default_value = "styles.css")]
    main: String,

    /// Minify every written stylesheet.
    #[arg(long)]
    minify: bool,

    /// JSON theme file flattened into `variables.css`.
    #[arg(long)]
    variables: Option<PathBuf>,
}

/// One compiled input.
#[derive(Debug, Clone, PartialEq)]
struct Output {
    layer: String,
    file_name: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("{}", NESTCSS_INTRO);

    // parse the args given in terminal
    let args: Args = Args::parse();

    match build(&args) {
        Ok(outputs) => {
            info!("Build completed: {} stylesheet(s).", outputs.len());
        }
        Err(e) => {
            eprintln!("Build failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn build(args: &Args) -> Result<Vec<Output>> {
    check_distinct_names(&args.inputs)?;
    let config = load_config(args.config.as_deref())?;
    let root_selector = config.root_selector().to_string();
    let options = config.into_options();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    // names are distinct, so every input writes its own file
    let outputs = args
        .inputs
        .par_iter()
        .map(|input| build_file(input, &options, args))
        .collect::<Result<Vec<_>>>()?;

    if let Some(theme) = &args.variables {
        let json = fs::read_to_string(theme)
            .with_context(|| format!("reading variables file {}", theme.display()))?;
        let theme_tree = tree::from_json(&json)
            .with_context(|| format!("parsing variables file {}", theme.display()))?;
        let css = variables::variables_block(&root_selector, &theme_tree)
            .with_context(|| format!("flattening {}", theme.display()))?;
        write_stylesheet(&args.out_dir.join("variables.css"), &css, args.minify)?;
    }

    if args.layers {
        write_stylesheet(&args.out_dir.join(&args.main), &main_stylesheet(&outputs), args.minify)?;
    }
    Ok(outputs)
}

fn load_config(path: Option<&Path>) -> Result<StyleConfig> {
    let Some(path) = path else {
        return Ok(StyleConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    StyleConfig::from_json(&json).with_context(|| format!("parsing config file {}", path.display()))
}

fn build_file(input: &Path, options: &CompileOptions, args: &Args) -> Result<Output> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("reading style file {}", input.display()))?;
    let style_tree = tree::from_json(&json)
        .with_context(|| format!("parsing style file {}", input.display()))?;
    let css = nestcss_lib::compile(&style_tree, options)
        .with_context(|| format!("compiling {}", input.display()))?;

    let layer = layer_name(input)?;
    let css = if args.layers {
        wrap_block(&format!("@layer {layer}"), &css)
    } else {
        css
    };

    let file_name = format!("{layer}.css");
    write_stylesheet(&args.out_dir.join(&file_name), &css, args.minify)?;
    Ok(Output { layer, file_name })
}

/// `base.styles.json` -> `base`.
fn layer_name(input: &Path) -> Result<String> {
    input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive a stylesheet name from {}", input.display()))
}

/// Fails when two inputs would write the same stylesheet.
fn check_distinct_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: IndexMap<String, &Path> = IndexMap::with_capacity(inputs.len());
    for input in inputs {
        let name = layer_name(input)?;
        if let Some(first) = seen.get(&name) {
            return Err(anyhow!(
                "{} and {} both compile to {name}.css",
                first.display(),
                input.display()
            ));
        }
        seen.insert(name, input);
    }
    Ok(())
}

/// `@layer a, b;` then one `@import` per stylesheet, in input order.
fn main_stylesheet(outputs: &[Output]) -> String {
    let layers = outputs
        .iter()
        .map(|output| output.layer.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut css = format!("@layer {layers};");
    for output in outputs {
        css.push_str(&format!("\n@import '{}';", output.file_name));
    }
    css
}

fn write_stylesheet(path: &Path, css: &str, minify: bool) -> Result<()> {
    let contents = if minify {
        minify_css(css).with_context(|| format!("minifying {}", path.display()))?
    } else {
        format!("{css}\n")
    };
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn minify_css(css: &str) -> Result<String> {
    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| anyhow!("parse error: {}", e))?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| anyhow!("minify error: {}", e))?;
    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("print error: {}", e))?;
    Ok(printed.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("nestcss").chain(extra.iter().copied()))
    }

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name(Path::new("src/base.styles.json")).unwrap(), "base");
        assert_eq!(layer_name(Path::new("theme.json")).unwrap(), "theme");
        assert!(layer_name(Path::new(".json")).is_err());
    }

    #[test]
    fn test_main_stylesheet() {
        let outputs = vec![
            Output {
                layer: "reset".into(),
                file_name: "reset.css".into(),
            },
            Output {
                layer: "base".into(),
                file_name: "base.css".into(),
            },
        ];
        assert_eq!(
            main_stylesheet(&outputs),
            "@layer reset, base;\n@import 'reset.css';\n@import 'base.css';"
        );
    }

    #[test]
    fn test_build_with_layers_and_config() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let config = write(
            &src,
            "config.json",
            r#"{ "mediaSelectors": { "device": { "phone": [{ "mediaQuery": "(max-width: 499px)" }] } } }"#,
        );
        let base = write(
            &src,
            "base.styles.json",
            r#"{ "p": { "fontSize": "16px", "@phone": { "fontSize": "12px" } } }"#,
        );
        let reset = write(&src, "reset.json", r#"{ "*": { "margin": 0 } }"#);

        let args = args(&[
            base.to_str().unwrap(),
            reset.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--out-dir",
            out.path().to_str().unwrap(),
            "--layers",
        ]);
        let outputs = build(&args).unwrap();
        assert_eq!(outputs.len(), 2);

        assert_eq!(
            fs::read_to_string(out.path().join("base.css")).unwrap(),
            "@layer base {\n  p {\n    font-size: 16px;\n  }\n\n  @media (max-width: 499px) {\n    p {\n      font-size: 12px;\n    }\n  }\n}\n"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("styles.css")).unwrap(),
            "@layer base, reset;\n@import 'base.css';\n@import 'reset.css';\n"
        );
    }

    #[test]
    fn test_variables_and_minify() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let styles = write(&src, "app.json", r#"{ "div": { "color": "red" } }"#);
        let theme = write(&src, "theme.json", r##"{ "colors": { "paper": "#fff" } }"##);

        let args = args(&[
            styles.to_str().unwrap(),
            "-o",
            out.path().to_str().unwrap(),
            "--variables",
            theme.to_str().unwrap(),
            "--minify",
        ]);
        build(&args).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("app.css")).unwrap(),
            "div{color:red}"
        );
        assert!(fs::read_to_string(out.path().join("variables.css"))
            .unwrap()
            .contains("--colors-paper:"));
        assert!(!out.path().join("styles.css").exists());
    }

    #[test]
    fn test_inputs_sharing_a_name_are_rejected() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();
        let first = write(&src, "base.json", r#"{ "p": { "color": "red" } }"#);
        let second = write(&src, "sub/base.styles.json", r#"{ "p": { "color": "blue" } }"#);

        let args = args(&[
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "-o",
            out.path().to_str().unwrap(),
        ]);
        let err = build(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("both compile to base.css"));
        assert!(!out.path().join("base.css").exists());
    }

    #[test]
    fn test_bad_input_fails_with_context() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let broken = write(&src, "broken.json", r#"{ "p": { "margin": [[1]] } }"#);

        let args = args(&[broken.to_str().unwrap(), "-o", out.path().to_str().unwrap()]);
        let err = build(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing style file"));
    }
}
