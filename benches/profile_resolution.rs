//! Benchmarks for profile resolution and pipeline planning
//!
//! Catalog walks are first-match, so sources matching late families (or
//! nothing) are the worst case.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tc_catalog::{Catalog, VideoFamily};
use tc_core::descriptor::{AudioStream, VideoStream};
use tc_core::{MediaDescriptor, SourceLocation};
use tc_rules::{resolve_client_tier, ClientTier, Planner, ProfileResolver};
use transcast::Decider;

/// MPEG-2 in a program stream with AC-3; matches the first video family.
fn mpeg2_ps() -> MediaDescriptor {
    MediaDescriptor::new("MPEG-PS")
        .with_video(
            VideoStream::new("MPEG Video")
                .version(2)
                .profile("Main@Main")
                .bit_rate(6_000_000)
                .resolution(720, 576)
                .frame_rate(25.0),
        )
        .with_audio(AudioStream::new("AC-3").channels(6).sample_rate(48_000))
}

/// H.264 High profile in MP4 with stereo AAC-LC.
fn avc_mp4() -> MediaDescriptor {
    MediaDescriptor::new("MPEG-4")
        .with_video(
            VideoStream::new("AVC")
                .profile("High@L4.1")
                .bit_rate(8_000_000)
                .resolution(1920, 1080)
                .frame_rate(23.976),
        )
        .with_audio(AudioStream::new("AAC").profile("LC").channels(2).sample_rate(48_000))
}

/// VP9 with Opus; no family matches.
fn vp9_webm() -> MediaDescriptor {
    MediaDescriptor::new("WebM")
        .with_video(VideoStream::new("VP9").resolution(3840, 2160))
        .with_audio(AudioStream::new("Opus").channels(2))
}

fn bench_video_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("video_profile");
    let resolver = ProfileResolver::default();

    for (name, d) in [("mpeg2_ps", mpeg2_ps()), ("avc_mp4", avc_mp4()), ("vp9_miss", vp9_webm())] {
        group.bench_with_input(BenchmarkId::new("standard", name), &d, |b, d| {
            b.iter(|| resolver.resolve_video_profile(black_box(d)));
        });
    }

    // Moving the AVC family to the front shortens the walk for AVC sources.
    let mut order = vec![VideoFamily::Mpeg4Part10];
    order.extend(VideoFamily::STANDARD_ORDER.iter().copied().filter(|f| *f != VideoFamily::Mpeg4Part10));
    let avc_first = ProfileResolver::new(Catalog::standard().with_video_families(order));
    let d = avc_mp4();
    group.bench_function("avc_first/avc_mp4", |b| {
        b.iter(|| avc_first.resolve_video_profile(black_box(&d)));
    });

    group.finish();
}

fn bench_client_tier(c: &mut Criterion) {
    let mut group = c.benchmark_group("client_tier");
    let console = ["Mozilla/5.0 (Windows NT 10.0)", "XboxLive/3.0", "Windows-Media-Player/12"];
    let common = ["Mozilla/5.0 (X11; Linux x86_64)", "VLC/3.0.18 LibVLC/3.0.18"];

    group.bench_function("console", |b| b.iter(|| resolve_client_tier(black_box(&console[..]))));
    group.bench_function("common", |b| b.iter(|| resolve_client_tier(black_box(&common[..]))));
    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide");
    let decider = Decider::default();
    let agents = ["XboxLive/3.0"];
    let sources = [SourceLocation::local("/movies/movie.mkv")];

    for (name, d) in [("avc_mp4", avc_mp4()), ("mpeg2_ps", mpeg2_ps())] {
        group.bench_with_input(BenchmarkId::new("console", name), &d, |b, d| {
            b.iter(|| decider.decide(black_box(d), &agents, &sources));
        });
    }

    let planner = Planner::default();
    let d = mpeg2_ps();
    group.bench_function("plan_only/mpeg2_ps", |b| {
        b.iter(|| planner.plan_pipeline(ClientTier::Console, black_box(&d), &sources));
    });

    group.finish();
}

criterion_group!(benches, bench_video_resolution, bench_client_tier, bench_decide);
criterion_main!(benches);
