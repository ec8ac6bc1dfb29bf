use image::{imageops, GrayImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use super::engine::TemplateLocator;
use crate::error::TemplateError;
use crate::models::landmark::LandmarkMatch;
use crate::models::roi::Roi;

/// Landmark template, with its statistics precomputed for correlation
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub image: GrayImage,
    /// Pixel deviations from the template mean, row major
    deviations: Vec<f32>,
    /// sqrt(sum(deviation^2))
    norm: f32,
}

impl Template {
    pub fn new(name: impl Into<String>, image: GrayImage) -> Self {
        let count = (image.width() * image.height()).max(1) as f32;
        let mean = image.as_raw().iter().map(|&p| p as f32).sum::<f32>() / count;
        let deviations: Vec<f32> = image.as_raw().iter().map(|&p| p as f32 - mean).collect();
        let norm = deviations.iter().map(|d| d * d).sum::<f32>().sqrt();

        Self {
            name: name.into(),
            image,
            deviations,
            norm,
        }
    }

    /// Zero-mean normalized cross-correlation with the patch whose top-left
    /// corner is (x, y). Returns a value in [-1, 1]; flat patches score 0.
    fn correlate(&self, image: &GrayImage, x: u32, y: u32) -> f32 {
        let (tw, th) = self.image.dimensions();
        let stride = image.width() as usize;
        let pixels = image.as_raw();
        let n = (tw * th) as f64;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        let mut cross = 0.0f64;

        for ty in 0..th as usize {
            let row = (y as usize + ty) * stride + x as usize;
            let patch = &pixels[row..row + tw as usize];
            let devs = &self.deviations[ty * tw as usize..(ty + 1) * tw as usize];
            for (&p, &d) in patch.iter().zip(devs) {
                let p = p as f64;
                sum += p;
                sum_sq += p * p;
                cross += p * d as f64;
            }
        }

        let patch_var = sum_sq - sum * sum / n;
        if patch_var <= f64::EPSILON || self.norm <= f32::EPSILON {
            return 0.0;
        }

        (cross / (self.norm as f64 * patch_var.sqrt())) as f32
    }
}

/// Template matcher for the panel landmarks (bullets, separators, icons)
pub struct TemplateMatcher {
    templates: HashMap<String, Template>,
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateMatcher {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Load every PNG in `template_dir`; the file stem is the template name.
    /// Templates are resized by `scale` (recorded at the reference resolution).
    pub fn load_templates<P: AsRef<Path>>(
        &mut self,
        template_dir: P,
        scale: f64,
    ) -> Result<usize, TemplateError> {
        let template_dir = template_dir.as_ref();

        if !template_dir.exists() {
            return Err(TemplateError::DirectoryNotFound(
                template_dir.display().to_string(),
            ));
        }

        let mut loaded_count = 0;
        for entry in std::fs::read_dir(template_dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let img = image::open(&path).map_err(|source| TemplateError::Image {
                path: path.display().to_string(),
                source,
            })?;

            self.insert(name, rescale(img.to_luma8(), scale));
            loaded_count += 1;
        }

        if loaded_count == 0 {
            return Err(TemplateError::Empty(template_dir.display().to_string()));
        }

        tracing::info!(
            count = loaded_count,
            dir = %template_dir.display(),
            "loaded landmark templates"
        );

        Ok(loaded_count)
    }

    pub fn insert(&mut self, name: impl Into<String>, image: GrayImage) {
        let template = Template::new(name, image);
        self.templates.insert(template.name.clone(), template);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateLocator for TemplateMatcher {
    fn locate(
        &self,
        image: &GrayImage,
        template: &str,
        window: Roi,
        threshold: f32,
    ) -> Vec<LandmarkMatch> {
        let Some(tpl) = self.templates.get(template) else {
            tracing::debug!(template, "template not loaded");
            return Vec::new();
        };

        let (width, height) = image.dimensions();
        let Some(window) = window.clamp_to(width, height) else {
            return Vec::new();
        };

        let (tw, th) = tpl.image.dimensions();
        if !window.fits(tw, th) {
            return Vec::new();
        }

        // Top-left positions for which the template stays inside the window
        let x_last = window.x2() - tw;
        let y_last = window.y2() - th;

        let mut hits: Vec<(u32, u32, f32)> = (window.y..=y_last)
            .into_par_iter()
            .flat_map_iter(|y| {
                (window.x..=x_last).filter_map(move |x| {
                    let score = tpl.correlate(image, x, y);
                    (score >= threshold).then_some((x, y, score))
                })
            })
            .collect();

        // Keep the best hit of every cluster of overlapping hits
        hits.sort_by(|a, b| b.2.total_cmp(&a.2));
        let mut kept: Vec<(u32, u32, f32)> = Vec::new();
        for hit in hits {
            let overlaps = kept
                .iter()
                .any(|k| k.0.abs_diff(hit.0) < tw && k.1.abs_diff(hit.1) < th);
            if !overlaps {
                kept.push(hit);
            }
        }

        kept.into_iter()
            .map(|(x, y, score)| LandmarkMatch::new((x + tw / 2, y + th / 2), template, score))
            .collect()
    }
}

fn rescale(image: GrayImage, scale: f64) -> GrayImage {
    if (scale - 1.0).abs() < f64::EPSILON {
        return image;
    }

    let (w, h) = image.dimensions();
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);

    imageops::resize(&image, new_w, new_h, imageops::FilterType::Triangle)
}
