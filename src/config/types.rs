use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container engine executable, either a bare name searched on `PATH` or a path.
    pub engine: String,
    /// Build descriptor expected next to the input document.
    pub descriptor_name: String,
    /// Mount point of the input directory inside the container.
    pub container_root: String,
    /// Prefix for generated container names.
    pub container_prefix: String,
    /// Interpreter invocation that receives the render script as its last argument.
    pub render_shell: String,
    /// R packages attached before rendering.
    pub toolchain: Vec<String>,
    pub render_function: String,
    /// Pass-through option names managed here or unsupported in a container.
    pub reserved_options: Vec<String>,
}

impl Config {
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_options.iter().any(|k| k == key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: "docker".to_string(),
            descriptor_name: "Dockerfile".to_string(),
            container_root: "/liftrroot/".to_string(),
            container_prefix: "liftr_container_".to_string(),
            render_shell: "/usr/bin/Rscript -e".to_string(),
            toolchain: vec!["knitr".into(), "rmarkdown".into(), "shiny".into()],
            render_function: "render".to_string(),
            reserved_options: vec![
                "output_file".into(),
                "output_dir".into(),
                "intermediates_dir".into(),
            ],
        }
    }
}
