use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scalematch::io::{
    read_descriptors, read_descriptors_file, read_matrix_file, write_descriptors, write_descriptors_file,
    write_matrix_file,
};
use scalematch::{CrossScaleMatcher, Descriptor, DescriptorSet, KeypointMeta, MatchConfig, Matrix};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scalematch-{}-{name}", std::process::id()))
}

fn random_set(rng: &mut StdRng, keypoints: usize, n_levels: usize) -> DescriptorSet {
    let rows = (0..keypoints * n_levels)
        .map(|_| {
            let mut bytes = [0u8; 32];
            rng.fill(&mut bytes[..]);
            Descriptor::from_bytes(&bytes)
        })
        .collect();
    DescriptorSet::new(rows, n_levels).unwrap()
}

#[test]
fn descriptors_survive_text_round_trip() {
    let mut rng = StdRng::seed_from_u64(21);
    let set = random_set(&mut rng, 6, 3);
    let keypoints: Vec<KeypointMeta> = (0..set.len())
        .map(|i| KeypointMeta {
            x: rng.random_range(0.0..640.0f32).round(),
            y: rng.random_range(0.0..480.0f32).round(),
            octave: (i / 6) as i32,
            angle: 45.0,
            size: 31.0,
        })
        .collect();

    let mut text = Vec::new();
    write_descriptors(&mut text, &set, &keypoints).unwrap();
    let back = read_descriptors(text.as_slice(), 3).unwrap();
    assert_eq!(back.descriptors, set);
    assert_eq!(back.keypoints, keypoints);
}

#[test]
fn matcher_output_persists_through_files() {
    let mut rng = StdRng::seed_from_u64(4);
    let d1 = random_set(&mut rng, 3, 2);
    let d2 = random_set(&mut rng, 4, 2);
    let path1 = temp_path("d1.txt");
    write_descriptors_file(&path1, &d1, &[]).unwrap();
    let loaded = read_descriptors_file(&path1, 2).unwrap();
    assert_eq!(loaded.descriptors, d1);

    let matcher = CrossScaleMatcher::new(MatchConfig {
        n_levels: 2,
        ..MatchConfig::default()
    })
    .unwrap();
    let out = matcher.match_sets(&loaded.descriptors, &[], &d2, &[]).unwrap();
    let path2 = temp_path("hs.txt");
    write_matrix_file(&path2, &out.scores.scores).unwrap();
    let hs: Matrix<u32> = read_matrix_file(&path2).unwrap();
    assert_eq!(hs, out.scores.scores);

    let _ = std::fs::remove_file(path1);
    let _ = std::fs::remove_file(path2);
}
