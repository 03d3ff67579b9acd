#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
#[cfg(not(target_arch = "wasm32"))]
use rsx_texture::{
    get_subresources_layout, upload_texture_subresource, TextureDescriptor, TextureDimension,
    TextureFormat, TranscodeOptions, CELL_GCM_TEXTURE_LN,
};

#[cfg(not(target_arch = "wasm32"))]
fn criterion_config() -> Criterion {
    match std::env::var("RSX_TEXTURE_BENCH_PROFILE").as_deref() {
        Ok("ci") => Criterion::default()
            .warm_up_time(Duration::from_millis(150))
            .measurement_time(Duration::from_millis(400))
            .sample_size(10)
            .noise_threshold(0.05),
        _ => Criterion::default()
            .warm_up_time(Duration::from_secs(1))
            .measurement_time(Duration::from_secs(2))
            .sample_size(50)
            .noise_threshold(0.03),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn bench_upload(c: &mut Criterion) {
    let cases = [
        ("a8r8g8b8_linear", TextureFormat::A8R8G8B8, true),
        ("a8r8g8b8_swizzled", TextureFormat::A8R8G8B8, false),
        ("r5g6b5_linear", TextureFormat::R5G6B5, true),
        ("r6g5b5_swizzled", TextureFormat::R6G5B5, false),
        ("b8r8_g8r8_linear", TextureFormat::CompressedB8R8G8R8, true),
        ("dxt5_linear", TextureFormat::CompressedDxt45, true),
    ];
    let options = TranscodeOptions::default();

    let mut group = c.benchmark_group("upload_texture_subresource");
    for size in [256u16, 1024] {
        for (name, format, linear) in cases {
            let pitch = rsx_texture::packed_pitch(format, size);
            let desc = TextureDescriptor {
                format: format.code() | if linear { CELL_GCM_TEXTURE_LN } else { 0 },
                dimension: TextureDimension::Texture2d,
                width: size,
                height: size,
                depth: 1,
                mipmap: 1,
                pitch,
                address: 0,
            };
            let Ok(len) = rsx_texture::get_texture_size(&desc) else {
                continue;
            };
            let source: Vec<u8> = (0..len).map(|i| (i * 13) as u8).collect();
            let layouts = get_subresources_layout(&desc, &source).expect("layout");
            let layout = layouts[0];
            let mut dst = vec![
                0u8;
                layout
                    .destination_size(format, options.row_pitch_alignment)
                    .expect("destination size")
            ];

            group.throughput(Throughput::Bytes(layout.data.len() as u64));
            group.bench_function(BenchmarkId::new(name, format!("{size}x{size}")), |b| {
                b.iter(|| {
                    upload_texture_subresource(
                        black_box(&mut dst),
                        black_box(&layout),
                        format,
                        !linear,
                        &options,
                    )
                    .expect("upload");
                })
            });
        }
    }
    group.finish();
}

#[cfg(not(target_arch = "wasm32"))]
criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_upload
}
#[cfg(not(target_arch = "wasm32"))]
criterion_main!(benches);
