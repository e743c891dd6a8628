//! Single-page download form
//!
//! One probe or download runs at a time; background work lives on the shared
//! tokio runtime and reports back over channels polled each frame.

use crate::core::delivery::{self, DeliveredFile};
use crate::core::metadata::MediaMetadata;
use crate::core::progress::{ProgressEvent, ProgressStatus};
use crate::core::request::{stage_cookie_file, DownloadRequest};
use crate::core::{Downloader, FormatChoice};
use crate::gui::{runtime, thumbnail};
use crate::utils::outdir::resolve_output_dir;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::path::PathBuf;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Radio-button download choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChoiceKind {
    BestVideoAudio,
    AudioOnly,
    Custom,
}

enum ProbeMsg {
    Ok(Box<MediaMetadata>),
    Failed(String),
}

enum DownloadMsg {
    Progress(ProgressEvent),
    Done {
        files: Vec<DeliveredFile>,
        warnings: Vec<String>,
    },
    Failed(String),
}

/// Application state for the GUI
pub struct GrabApp {
    url_input: String,

    probing: bool,
    probe_rx: Option<UnboundedReceiver<ProbeMsg>>,
    probe_error: Option<String>,
    metadata: Option<MediaMetadata>,
    thumb_rx: Option<UnboundedReceiver<ColorImage>>,
    thumbnail: Option<TextureHandle>,

    choice: ChoiceKind,
    custom_code: String,
    output_dir: String,
    cookie_file: Option<PathBuf>,
    force_ipv4: bool,

    downloading: bool,
    download_rx: Option<UnboundedReceiver<DownloadMsg>>,
    progress_fraction: f32,
    status_line: String,
    download_error: Option<String>,

    delivered: Vec<DeliveredFile>,
    delivery_warnings: Vec<String>,
    save_feedback: Option<String>,
}

impl GrabApp {
    /// Create the app with the resolved default output directory pre-filled
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            url_input: String::new(),
            probing: false,
            probe_rx: None,
            probe_error: None,
            metadata: None,
            thumb_rx: None,
            thumbnail: None,
            choice: ChoiceKind::BestVideoAudio,
            custom_code: String::new(),
            output_dir: resolve_output_dir("").path.display().to_string(),
            cookie_file: None,
            force_ipv4: false,
            downloading: false,
            download_rx: None,
            progress_fraction: 0.0,
            status_line: String::new(),
            download_error: None,
            delivered: Vec::new(),
            delivery_warnings: Vec::new(),
            save_feedback: None,
        }
    }

    fn start_probe(&mut self) {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            self.probe_error = Some("Enter a URL first.".to_string());
            return;
        }

        self.probing = true;
        self.probe_error = None;
        self.metadata = None;
        self.thumbnail = None;
        self.delivered.clear();
        self.delivery_warnings.clear();
        self.download_error = None;
        self.save_feedback = None;

        let (tx, rx) = unbounded_channel();
        self.probe_rx = Some(rx);
        runtime().spawn(async move {
            match Downloader::new().probe(&url).await {
                Ok(meta) => {
                    let _ = tx.send(ProbeMsg::Ok(Box::new(meta)));
                }
                Err(e) => {
                    let _ = tx.send(ProbeMsg::Failed(e.to_string()));
                }
            }
        });
    }

    fn start_thumbnail_fetch(&mut self, url: String) {
        let (tx, rx) = unbounded_channel();
        self.thumb_rx = Some(rx);
        runtime().spawn_blocking(move || {
            if let Some(img) = thumbnail::fetch_thumbnail(&url) {
                let _ = tx.send(img);
            }
        });
    }

    fn selected_choice(&self) -> FormatChoice {
        match self.choice {
            ChoiceKind::BestVideoAudio => FormatChoice::BestVideoAudio,
            ChoiceKind::AudioOnly => FormatChoice::AudioOnly,
            ChoiceKind::Custom => FormatChoice::Custom(self.custom_code.clone()),
        }
    }

    fn start_download(&mut self) {
        let choice = self.selected_choice();
        // A blank custom code is the one selection-time error
        let format = match choice.expression() {
            Ok(expr) => expr,
            Err(e) => {
                self.download_error = Some(e.to_string());
                return;
            }
        };

        let resolved = resolve_output_dir(&self.output_dir);
        if resolved.fell_back {
            self.status_line = format!(
                "Requested folder is not writable; saving to {}",
                resolved.display()
            );
        } else {
            self.status_line = "Starting download...".to_string();
        }
        self.output_dir = resolved.path.display().to_string();

        self.downloading = true;
        self.download_error = None;
        self.progress_fraction = 0.0;
        self.delivered.clear();
        self.delivery_warnings.clear();
        self.save_feedback = None;

        let url = self.url_input.trim().to_string();
        let audio_transcode = choice
            .wants_audio_transcode()
            .then(DownloadRequest::standard_audio_transcode);
        let cookie_file = self.cookie_file.clone();
        let force_ipv4 = self.force_ipv4;
        let output_dir = resolved.path;

        let (tx, rx) = unbounded_channel();
        self.download_rx = Some(rx);
        runtime().spawn(async move {
            run_download(
                url,
                format,
                output_dir,
                audio_transcode,
                cookie_file,
                force_ipv4,
                tx,
            )
            .await;
        });
    }

    fn poll_background_work(&mut self, ctx: &egui::Context) {
        loop {
            let msg = match self.probe_rx.as_mut() {
                Some(rx) => rx.try_recv().ok(),
                None => None,
            };
            let Some(msg) = msg else { break };

            self.probing = false;
            match msg {
                ProbeMsg::Ok(meta) => {
                    if let Some(thumb_url) = meta.thumbnail.clone() {
                        self.start_thumbnail_fetch(thumb_url);
                    }
                    self.metadata = Some(*meta);
                }
                ProbeMsg::Failed(e) => self.probe_error = Some(e),
            }
        }

        if let Some(rx) = &mut self.thumb_rx {
            while let Ok(img) = rx.try_recv() {
                self.thumbnail = Some(ctx.load_texture("thumbnail", img, TextureOptions::default()));
            }
        }

        if let Some(rx) = &mut self.download_rx {
            while let Ok(msg) = rx.try_recv() {
                match msg {
                    DownloadMsg::Progress(event) => {
                        self.progress_fraction = match event.status {
                            ProgressStatus::Downloading => (event.percent() / 100.0) as f32,
                            ProgressStatus::Finished => 1.0,
                        };
                        self.status_line = event.message();
                    }
                    DownloadMsg::Done { files, warnings } => {
                        self.downloading = false;
                        self.progress_fraction = 1.0;
                        self.status_line = "Download completed successfully!".to_string();
                        self.delivered = files;
                        self.delivery_warnings = warnings;
                    }
                    DownloadMsg::Failed(e) => {
                        self.downloading = false;
                        self.status_line.clear();
                        self.download_error = Some(e);
                    }
                }
            }
        }
    }

    fn metadata_section(&mut self, ui: &mut egui::Ui) {
        let Some(meta) = &self.metadata else {
            return;
        };

        ui.separator();
        ui.horizontal(|ui| {
            if let Some(tex) = &self.thumbnail {
                ui.image(tex);
            }
            egui::Grid::new("metadata").num_columns(2).show(ui, |ui| {
                ui.label("Title:");
                ui.label(&meta.title);
                ui.end_row();
                ui.label("Uploader:");
                ui.label(&meta.uploader);
                ui.end_row();
                ui.label("Length:");
                ui.label(meta.duration_string());
                ui.end_row();
                ui.label("Views:");
                ui.label(meta.views().to_string());
                ui.end_row();
            });
        });
    }

    fn format_table(&mut self, ui: &mut egui::Ui) {
        let Some(meta) = &self.metadata else {
            return;
        };

        egui::ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
            egui::Grid::new("formats").striped(true).show(ui, |ui| {
                for header in ["Code", "Ext", "Quality", "Video", "Audio", "Bitrate", "Size"] {
                    ui.strong(header);
                }
                ui.end_row();

                for f in &meta.formats {
                    ui.label(&f.format_id);
                    ui.label(&f.ext);
                    ui.label(f.quality_label());
                    ui.label(f.vcodec.as_deref().unwrap_or("?"));
                    ui.label(f.acodec.as_deref().unwrap_or("?"));
                    ui.label(f.bitrate_string());
                    ui.label(f.size_string());
                    ui.end_row();
                }
            });
        });
        ui.horizontal(|ui| {
            ui.label("Format code:");
            ui.text_edit_singleline(&mut self.custom_code);
        });
    }

    fn delivery_section(&mut self, ui: &mut egui::Ui) {
        if self.delivered.is_empty() && self.delivery_warnings.is_empty() {
            return;
        }

        ui.separator();
        ui.heading("Downloaded files");
        let mut feedback = None;
        for file in &self.delivered {
            ui.horizontal(|ui| {
                let size = file
                    .size_string()
                    .map(|s| format!(", {}", s))
                    .unwrap_or_default();
                ui.label(format!("{} ({}{})", file.file_name, file.mime, size));
                if ui.button("Save as...").clicked() {
                    feedback = Some(save_delivered_file(file));
                }
            });
        }
        for warning in &self.delivery_warnings {
            ui.colored_label(egui::Color32::YELLOW, warning);
        }
        if feedback.is_some() {
            self.save_feedback = feedback;
        }
        if let Some(msg) = &self.save_feedback {
            ui.label(msg);
        }
    }
}

impl eframe::App for GrabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background_work(ctx);
        let busy = self.probing || self.downloading;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("TubeGrab");
                ui.label("Download a video or audio stream via yt-dlp.");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("URL:");
                    ui.text_edit_singleline(&mut self.url_input);
                    if ui
                        .add_enabled(!busy, egui::Button::new("Fetch info"))
                        .clicked()
                    {
                        self.start_probe();
                    }
                });

                if self.probing {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Fetching media info...");
                    });
                }
                if let Some(e) = &self.probe_error {
                    ui.colored_label(egui::Color32::RED, e);
                }

                self.metadata_section(ui);

                if self.metadata.is_some() {
                    ui.separator();
                    ui.label("Choose download option:");
                    ui.radio_value(
                        &mut self.choice,
                        ChoiceKind::BestVideoAudio,
                        "Video and Audio (Highest Quality)",
                    );
                    ui.radio_value(
                        &mut self.choice,
                        ChoiceKind::AudioOnly,
                        "Audio only (Highest Quality)",
                    );
                    ui.radio_value(&mut self.choice, ChoiceKind::Custom, "Custom format choice");

                    if self.choice == ChoiceKind::Custom {
                        self.format_table(ui);
                    }

                    ui.horizontal(|ui| {
                        ui.label("Download folder:");
                        ui.text_edit_singleline(&mut self.output_dir);
                        if ui.button("Browse...").clicked() {
                            if let Some(folder) = rfd::FileDialog::new()
                                .set_directory(&self.output_dir)
                                .pick_folder()
                            {
                                self.output_dir = folder.display().to_string();
                            }
                        }
                    });

                    ui.collapsing("Advanced", |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Cookie file:");
                            match &self.cookie_file {
                                Some(path) => {
                                    ui.label(path.display().to_string());
                                }
                                None => {
                                    ui.label("none");
                                }
                            }
                            if ui.button("Choose...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("Cookie file", &["txt"])
                                    .pick_file()
                                {
                                    self.cookie_file = Some(path);
                                }
                            }
                            if self.cookie_file.is_some() && ui.button("Clear").clicked() {
                                self.cookie_file = None;
                            }
                        });
                        ui.checkbox(&mut self.force_ipv4, "Force IPv4 connections");
                    });

                    if ui
                        .add_enabled(!busy, egui::Button::new("Download"))
                        .clicked()
                    {
                        self.start_download();
                    }
                }

                if self.downloading || !self.status_line.is_empty() {
                    ui.add(egui::ProgressBar::new(self.progress_fraction).show_percentage());
                    ui.label(&self.status_line);
                }
                if let Some(e) = &self.download_error {
                    ui.colored_label(egui::Color32::RED, e);
                }

                self.delivery_section(ui);
            });
        });

        // Keep polling the channels while work is in flight
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Background download worker: stages the cookie file, runs the download,
/// and loads the results into memory for in-browser-style delivery.
async fn run_download(
    url: String,
    format: String,
    output_dir: PathBuf,
    audio_transcode: Option<crate::core::AudioTranscode>,
    cookie_file: Option<PathBuf>,
    force_ipv4: bool,
    tx: UnboundedSender<DownloadMsg>,
) {
    // Uploaded cookies are copied into a temp file that is removed when the
    // guard drops, whatever the outcome
    let cookie_guard = match &cookie_file {
        Some(path) => {
            let staged = std::fs::read(path)
                .map_err(|e| format!("cannot read cookie file {}: {}", path.display(), e))
                .and_then(|bytes| {
                    stage_cookie_file(&bytes).map_err(|e| format!("cookie staging failed: {}", e))
                });
            match staged {
                Ok(file) => Some(file),
                Err(e) => {
                    let _ = tx.send(DownloadMsg::Failed(e));
                    return;
                }
            }
        }
        None => None,
    };

    let request = DownloadRequest {
        format,
        output_dir,
        audio_transcode,
        cookie_file: cookie_guard.as_ref().map(|f| f.path().to_path_buf()),
        force_ipv4,
        ..Default::default()
    };

    let progress_tx = tx.clone();
    let result = Downloader::new()
        .download(&url, &request, move |event| {
            let _ = progress_tx.send(DownloadMsg::Progress(event));
        })
        .await;

    match result {
        Ok(paths) => {
            let (files, warnings) = delivery::load_all(&paths);
            let _ = tx.send(DownloadMsg::Done { files, warnings });
        }
        Err(e) => {
            let _ = tx.send(DownloadMsg::Failed(e.to_string()));
        }
    }
}

/// Offer one delivered file through a save dialog; returns a feedback line
fn save_delivered_file(file: &DeliveredFile) -> String {
    let Some(bytes) = &file.bytes else {
        return format!("{}: contents were not loaded", file.file_name);
    };

    let Some(target) = rfd::FileDialog::new()
        .set_file_name(file.file_name.clone())
        .save_file()
    else {
        return "Save cancelled.".to_string();
    };

    match std::fs::write(&target, bytes) {
        Ok(()) => format!("Saved {}", target.display()),
        Err(e) => format!("Could not save {}: {}", target.display(), e),
    }
}
