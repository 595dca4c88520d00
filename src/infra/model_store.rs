// ============================================================
// Layer 6 — Model Store
// ============================================================
// Persists the trained steering model so it can be reloaded
// for autonomous driving later.
//
// Artifact layout (name defaults to "model"):
//   <dir>/
//     model.mpk          ← weights (full precision, MessagePack)
//     model.json         ← PilotNetConfig, needed to rebuild the graph
//     train_config.json  ← hyperparameters of the run that produced it
//
// Loading rebuilds the network from model.json first and then
// restores the weights into it; the recorder refuses records
// whose shapes do not match that architecture.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{PilotNet, PilotNetConfig};

const WEIGHTS_EXTENSION: &str = "mpk";

/// Weights are stored as trained, without lowering precision.
type WeightsRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;
const TRAIN_CONFIG_FILE: &str = "train_config.json";

/// Saves and restores the model artifact under one directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir:  PathBuf,
    name: String,
}

impl ModelStore {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create model directory '{}'", dir.display()))?;
        Ok(Self { dir, name: name.into() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the weights file written by save_model().
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{WEIGHTS_EXTENSION}", self.name))
    }

    /// Path of the architecture config written by save_model().
    pub fn architecture_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }

    /// True once both halves of the artifact exist.
    pub fn exists(&self) -> bool {
        self.weights_path().exists() && self.architecture_path().exists()
    }

    /// Write weights and architecture. Returns the weights path.
    pub fn save_model<B: Backend>(
        &self,
        model:     &PilotNet<B>,
        model_cfg: &PilotNetConfig,
    ) -> Result<PathBuf> {
        let arch_path = self.architecture_path();
        fs::write(&arch_path, serde_json::to_string_pretty(model_cfg)?)
            .with_context(|| format!("Cannot write architecture to '{}'", arch_path.display()))?;

        // The recorder appends its own extension
        let stem = self.dir.join(&self.name);
        WeightsRecorder::new()
            .record(model.clone().into_record(), stem)
            .with_context(|| {
                format!("Failed to save model to '{}'", self.weights_path().display())
            })?;

        tracing::info!("Model saved to '{}'", self.weights_path().display());
        Ok(self.weights_path())
    }

    /// Rebuild the network from its saved architecture and load the weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<(PilotNet<B>, PilotNetConfig)> {
        let arch_path = self.architecture_path();
        let json = fs::read_to_string(&arch_path).with_context(|| {
            format!(
                "Cannot read architecture from '{}'. Have you trained the model first?",
                arch_path.display()
            )
        })?;
        let model_cfg: PilotNetConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed architecture file '{}'", arch_path.display()))?;

        let model: PilotNet<B> = model_cfg.init(device)?;

        let stem   = self.dir.join(&self.name);
        let record = WeightsRecorder::new()
            .load(stem, device)
            .with_context(|| {
                format!("Cannot load weights '{}'", self.weights_path().display())
            })?;

        tracing::info!("Model loaded from '{}'", self.weights_path().display());
        Ok((model.load_record(record), model_cfg))
    }

    pub fn save_train_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_train_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
