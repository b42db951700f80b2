
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

/// The alphabet the engine works over
pub const DNA_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Creates a test set we can verify is working: a random DNA backbone plus
/// noisy samples drawn from it
/// # Arguments
/// * `seq_len` - the length of the backbone sequence
/// * `num_samples` - the number of samples to generate from the backbone
/// * `error_rate` - overall error rate, assumes mismatch, insertion, and deletion are equally likely sub-components of this error rate
pub fn generate_test(seq_len: usize, num_samples: usize, error_rate: f64) -> (Vec<u8>, Vec<Vec<u8>>) {
    assert!((0.0..=1.0).contains(&error_rate));

    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let base_distribution = Uniform::new(0, DNA_BASES.len());
    let basem1_distribution = Uniform::new(0, DNA_BASES.len() - 1);
    let error_distribution = Uniform::new(0.0, 1.0);
    let error_type_distribution = Uniform::new(0, 3);

    let backbone: Vec<u8> = (0..seq_len)
        .map(|_i| DNA_BASES[rng.sample(base_distribution)])
        .collect();

    let samples: Vec<Vec<u8>> = (0..num_samples)
        .map(|_i| {

            let mut seq = vec![];
            let mut backbone_index = 0;
            while backbone_index < backbone.len() {
                let c = backbone[backbone_index];
                let is_error = rng.sample(error_distribution) < error_rate;
                if is_error {
                    let error_type = rng.sample(error_type_distribution);
                    match error_type {
                        0 => {
                            // substitution
                            let base_offset = DNA_BASES.iter().position(|&b| b == c).unwrap();
                            let sub_offset = rng.sample(basem1_distribution);
                            let alt_c = DNA_BASES[(base_offset + 1 + sub_offset) % DNA_BASES.len()];
                            seq.push(alt_c);
                            backbone_index += 1;
                        },
                        1 => {
                            // deletion
                            backbone_index += 1;
                        },
                        2 => {
                            //insertion
                            let s = DNA_BASES[rng.sample(base_distribution)];
                            seq.push(s);
                        },
                        _ => panic!("no impl")
                    }
                } else {
                    seq.push(c);
                    backbone_index += 1;
                }
            }
            seq
        })
        .collect();

    (backbone, samples)
}
