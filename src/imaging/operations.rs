//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take rewrite records, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{PlannedVariant, plan_variants};
use super::params::ResizeParams;
use crate::deferred::Deferred;
use crate::rewrite::ImageRewrite;
use crate::size_class::SizeClass;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Generated image variant with its public path and dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedVariant {
    pub size_class: SizeClass,
    /// Target file path as referenced from the site, e.g. `img-optimized/a-small.webp`.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Plan the backend calls for a set of rewrites without executing them.
pub fn plan_resizes(
    source: &Path,
    output_dir: &Path,
    rewrites: &[ImageRewrite],
    original: (u32, u32),
) -> Vec<ResizeParams> {
    rewrites
        .iter()
        .zip(plan_variants(original, rewrites))
        .map(|(rewrite, PlannedVariant { width, height, .. })| ResizeParams {
            source: source.to_path_buf(),
            output: output_dir.join(rewrite.target.full_file_name()),
            width,
            height,
            encode: rewrite.target.format.encode_params(),
        })
        .collect()
}

/// Create one variant per rewrite record.
///
/// Each variant is the source scaled so its longer edge equals the record's
/// size-class bound, encoded in the record's target format and written to
/// `output_dir` under the target file name.
pub fn create_variants(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    rewrites: &[ImageRewrite],
    original: (u32, u32),
) -> Result<Vec<GeneratedVariant>> {
    let plans = plan_resizes(source, output_dir, rewrites, original);
    let mut variants = Vec::with_capacity(plans.len());

    for (rewrite, params) in rewrites.iter().zip(plans) {
        backend.resize(&params)?;
        variants.push(GeneratedVariant {
            size_class: rewrite.size_class,
            path: rewrite.target.file_path(),
            width: params.width,
            height: params.height,
        });
    }

    Ok(variants)
}

/// Run a single resize on the rayon pool, delivering the outcome as a [`Deferred`].
///
/// Combine with [`Deferred::with_timeout`] or the cancellation token to bound
/// slow encodes; a resize cancelled or timed out before it starts is never
/// executed.
pub fn resize_deferred<B>(backend: Arc<B>, params: ResizeParams) -> Deferred<Result<ResizeParams>>
where
    B: ImageBackend + Send + 'static,
{
    Deferred::spawn(move || backend.resize(&params).map(|()| params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::DeferredError;
    use crate::format::{EncodeParams, ImageFormat};
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::location::AssetPath;
    use crate::rewrite::{ImageConfiguration, rewrites};

    fn background_rewrites(sizes: Vec<SizeClass>) -> Vec<ImageRewrite> {
        let config =
            ImageConfiguration::new(Path::new("/src/background.jpg"), ImageFormat::Webp, sizes)
                .unwrap();
        rewrites(
            &AssetPath::new("Resources/img"),
            &AssetPath::new("img-optimized"),
            &config,
        )
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(&[(
            "test.jpg",
            Dimensions {
                width: 1920,
                height: 1080,
            },
        )]);

        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn plan_resizes_uses_target_names_and_formats() {
        let plans = plan_resizes(
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(vec![SizeClass::Small]),
            (2000, 1000),
        );
        assert_eq!(
            plans,
            vec![ResizeParams {
                source: "/src/background.jpg".into(),
                output: "/out/background-small.webp".into(),
                width: 900,
                height: 450,
                encode: EncodeParams::WebP,
            }]
        );
    }

    #[test]
    fn create_variants_resizes_once_per_rewrite() {
        let backend = MockBackend::new();
        let variants = create_variants(
            &backend,
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(SizeClass::ALL.to_vec()),
            (3000, 2000),
        )
        .unwrap();

        let widths: Vec<u32> = variants.iter().map(|v| v.width).collect();
        assert_eq!(widths, [600, 900, 1200, 1800]);
        assert_eq!(variants[0].path, "img-optimized/background-extra-small.webp");
        assert_eq!(variants[3].height, 1200);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 4);
        assert!(ops.iter().all(|op| matches!(
            op,
            RecordedOp::Resize { output, encode: EncodeParams::WebP, .. } if output.ends_with(".webp")
        )));
    }

    #[tokio::test]
    async fn resize_deferred_delivers_params_on_success() {
        let backend = Arc::new(MockBackend::new());
        let params = plan_resizes(
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(vec![SizeClass::Normal]),
            (2400, 1600),
        )
        .remove(0);

        let done = resize_deferred(backend.clone(), params.clone())
            .map(|result| result.map(|p| (p.width, p.height)))
            .await
            .unwrap();
        assert_eq!(done.unwrap(), (1200, 800));
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[tokio::test]
    async fn resize_deferred_surfaces_backend_errors() {
        let backend = Arc::new(MockBackend::new().fail_resize_for("background.jpg"));
        let params = plan_resizes(
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(vec![SizeClass::Small]),
            (2400, 1600),
        )
        .remove(0);

        let outcome = resize_deferred(backend, params).await.unwrap();
        assert!(matches!(outcome, Err(BackendError::ProcessingFailed(_))));
    }

    /// Queue a resize on a single-thread pool whose only worker is held by a
    /// job blocked on the returned sender.
    fn queued_behind_busy_worker(
        backend: Arc<MockBackend>,
        params: ResizeParams,
    ) -> (
        rayon::ThreadPool,
        Deferred<Result<ResizeParams>>,
        std::sync::mpsc::Sender<()>,
    ) {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let (deferred_tx, deferred_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        pool.spawn(move || {
            // Spawned from the worker, so the resize lands in this pool's queue.
            deferred_tx.send(resize_deferred(backend, params)).unwrap();
            release_rx.recv().ok();
        });
        let deferred = deferred_rx.recv().unwrap();
        (pool, deferred, release_tx)
    }

    fn normal_params() -> ResizeParams {
        plan_resizes(
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(vec![SizeClass::Normal]),
            (2400, 1600),
        )
        .remove(0)
    }

    #[tokio::test]
    async fn resize_deferred_cancelled_before_start_never_resizes() {
        let backend = Arc::new(MockBackend::new());
        let (pool, deferred, release) = queued_behind_busy_worker(backend.clone(), normal_params());

        deferred.cancel();
        release.send(()).unwrap();
        assert!(matches!(deferred.await, Err(DeferredError::Cancelled)));

        // Runs after the queued resize job, so that job has had its turn.
        pool.install(|| ());
        assert!(backend.get_operations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn resize_deferred_times_out_while_queued() {
        let backend = Arc::new(MockBackend::new());
        let (pool, deferred, release) = queued_behind_busy_worker(backend.clone(), normal_params());
        let limit = std::time::Duration::from_secs(10);

        let outcome = deferred.with_timeout(limit).await;
        assert!(matches!(outcome, Err(DeferredError::TimedOut(d)) if d == limit));

        release.send(()).unwrap();
        pool.install(|| ());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_variants_stops_at_first_backend_error() {
        let backend = MockBackend::new().fail_resize_for("background.jpg");
        let result = create_variants(
            &backend,
            Path::new("/src/background.jpg"),
            Path::new("/out"),
            &background_rewrites(SizeClass::ALL.to_vec()),
            (3000, 2000),
        );
        assert!(result.is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }
}
