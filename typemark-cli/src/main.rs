use anyhow::Result;
use clap::Parser;
use std::path::Path;

// Import from typemark-core
use typemark_core::{
    AnnotatedDocument, AnnotationProfile, AnnotatorConfig, DebugConfig, Section, SectionAnnotator,
    SCHEMA_VERSION,
};

#[derive(Parser)]
#[command(name = "typemark")]
#[command(about = "Annotate document sections with structural-type labels")]
struct Args {
    /// Path to the sections JSON file to annotate
    #[arg(short, long, default_value = "sections.json")]
    input: String,

    /// Path to rule config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Include the annotation profile (label/token counts) in the output
    #[arg(long)]
    include_profile: bool,

    /// Disable the automatic frequency labels (has-*, is-*)
    #[arg(long)]
    no_frequency_labels: bool,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Enable detailed profiling of annotation steps
    #[arg(long)]
    profile: bool,

    /// Only trace sections whose labels match these patterns (regex, falls
    /// back to substring match)
    #[arg(long)]
    filter: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🏷️  Typemark Section Annotator");

    if args.show_configs {
        show_help();
        return Ok(());
    }

    // Check if input file exists
    if !Path::new(&args.input).exists() {
        println!("⚠️  Input file not found at: {}", args.input);
        println!("   Please check the file path.");
        return Ok(());
    }

    // Load config using the functional pattern
    let mut config = AnnotatorConfig::load_with_fallback(args.config.as_deref());

    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if args.include_profile {
        config.include_profile = true;
    }
    if args.no_frequency_labels {
        config.frequency_labels = false;
    }

    println!("📄 Annotating: {}", args.input);
    let sections = load_sections(&args.input)?;
    println!("📊 Loaded {} sections ({} rules configured)", sections.len(), config.rules.len());

    let mut annotator = SectionAnnotator::new();
    if !args.filter.is_empty() {
        annotator.set_debug_config(DebugConfig::new(true, args.filter.clone()));
    }

    match annotator.annotate_with_profiling(sections, &config, args.profile) {
        Ok(annotated) => {
            println!("✅ Successfully annotated {} sections", annotated.len());

            // Generate output path
            let output_path = if let Some(output) = &args.output {
                output.clone()
            } else {
                let input_name = Path::new(&args.input)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let config_suffix = args
                    .config
                    .as_ref()
                    .and_then(|p| Path::new(p).file_stem())
                    .and_then(|s| s.to_str())
                    .map(|s| format!("_{s}"))
                    .unwrap_or_default();
                format!("{input_name}{config_suffix}_typemark.json")
            };

            save_annotated(annotated, &config, &output_path, args.pretty)?;
        }
        Err(e) => {
            eprintln!("❌ Annotation failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn load_sections(path: &str) -> Result<Vec<Section>> {
    let contents = std::fs::read_to_string(path)?;
    let sections: Vec<Section> = serde_json::from_str(&contents)?;
    Ok(sections)
}

fn save_annotated(
    sections: Vec<Section>,
    config: &AnnotatorConfig,
    output_path: &str,
    pretty: bool,
) -> Result<()> {
    let profile = if config.include_profile {
        Some(AnnotationProfile::compute(&sections))
    } else {
        None
    };

    let document = AnnotatedDocument {
        schema_version: SCHEMA_VERSION.to_string(),
        sections,
        profile,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    std::fs::write(output_path, json)?;

    println!("💾 Annotated sections saved to: {}", output_path);
    Ok(())
}

fn show_help() {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>         Load rule config file (YAML)");
    println!("  --input <path>          Sections JSON file to annotate");
    println!("  --output <path>         Output file path (auto-generated if not specified)");
    println!("  --pretty                Pretty-print the output JSON");
    println!("  --include-profile       Include label/token counts in the output");
    println!("  --no-frequency-labels   Skip the automatic has-*/is-* labels");
    println!("  --filter <pattern>      Trace sections whose labels match (repeatable)");
    println!("  --profile               Time each annotation step");

    println!("\n📄 Input Format:");
    println!("  A JSON array of sections, each with a \"nodes\" array;");
    println!("  every node needs a \"kind\"; other fields pass through untouched:");
    println!("  [{{\"nodes\": [{{\"kind\": \"heading\"}}, {{\"kind\": \"paragraph\"}}]}}]");

    println!("\n📁 Example config files in ./configs/:");
    println!("  article-shapes.yaml     - Common article/gallery/listing shapes");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i sections.json");
    println!("  cargo run -- -i sections.json -c configs/article-shapes.yaml --pretty");
    println!("  cargo run -- -i sections.json --include-profile -o annotated.json");
}
