use neuro::{Network, NetworkConfig, SparseInput, TrainConfig, Trainer};
use rand::{SeedableRng, rngs::StdRng};

const XOR_INPUTS: [[f64; 2]; 4] = [[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
const XOR_TARGETS: [[f64; 1]; 4] = [[0.], [1.], [1.], [0.]];

fn seeded_network(config: NetworkConfig, seed: u64) -> Network {
    Network::new(config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn seeded_trainer(epochs: usize, seed: u64) -> Trainer<StdRng, ()> {
    let config = TrainConfig::new(epochs).with_seed(seed);
    Trainer::new(&config, config.rng(), ())
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

#[test]
fn converges_on_xor2() {
    let mut net = seeded_network(NetworkConfig::new(2, 4, 1, false), 42);
    let history = seeded_trainer(5000, 7)
        .train(&mut net, &XOR_INPUTS, &XOR_TARGETS)
        .unwrap();

    assert!(mean(&history[history.len() - 100..]) < mean(&history[..100]));

    for (x, t) in XOR_INPUTS.iter().zip(&XOR_TARGETS) {
        let y = net.forward(x).unwrap()[0];
        assert!((y - t[0]).abs() < 0.1, "{x:?} -> {y}, expected {}", t[0]);
    }
}

#[test]
fn converges_on_and2() {
    let targets = [[0.], [0.], [0.], [1.]];
    let mut net = seeded_network(NetworkConfig::new(2, 3, 1, false), 1);

    seeded_trainer(3000, 2)
        .train(&mut net, &XOR_INPUTS, &targets)
        .unwrap();

    for (x, t) in XOR_INPUTS.iter().zip(&targets) {
        let y = net.forward(x).unwrap()[0];
        assert!((y - t[0]).abs() < 0.1, "{x:?} -> {y}, expected {}", t[0]);
    }
}

#[test]
fn regression_fits_a_line() {
    let inputs: Vec<[f64; 1]> = (0..20).map(|i| [i as f64 / 20.]).collect();
    let targets: Vec<[f64; 1]> = inputs.iter().map(|x| [3. * x[0] - 1.]).collect();

    let config = NetworkConfig::new(1, 4, 1, true).with_rates(0.05, 0.1);
    let mut net = seeded_network(config, 3);
    let history = seeded_trainer(2000, 4)
        .train(&mut net, &inputs, &targets)
        .unwrap();

    assert!(history[history.len() - 1] < history[0]);

    let y = net.forward(&[0.95]).unwrap()[0];
    assert!(y > 1., "regression output should leave [0, 1], got {y}");
    assert!((y - 1.85).abs() < 0.2, "got {y}");
}

#[test]
fn sparse_training_learns_which_feature_is_on() {
    // 6 one-hot features, the target says whether the active one is even
    let inputs: Vec<SparseInput> = (0..6).map(|i| SparseInput::from([(i, 1.)])).collect();
    let targets: Vec<[f64; 1]> = (0..6).map(|i| [if i % 2 == 0 { 1. } else { 0. }]).collect();

    let mut net = seeded_network(NetworkConfig::new(6, 4, 1, false), 5);
    seeded_trainer(3000, 6)
        .train_sparse(&mut net, &inputs, &targets)
        .unwrap();

    for (x, t) in inputs.iter().zip(&targets) {
        let y = net.forward_sparse(x).unwrap()[0];
        assert!((y - t[0]).abs() < 0.2, "{x:?} -> {y}, expected {}", t[0]);
    }
}

#[test]
fn trained_network_survives_a_save_and_load() {
    let mut net = seeded_network(NetworkConfig::new(2, 4, 1, false), 8);
    seeded_trainer(200, 9)
        .train(&mut net, &XOR_INPUTS, &XOR_TARGETS)
        .unwrap();

    let mut buf = Vec::new();
    net.save(&mut buf).unwrap();
    let mut loaded = Network::load(buf.as_slice()).unwrap();

    assert_eq!(loaded, net);
    for x in &XOR_INPUTS {
        let a = net.forward(x).unwrap().to_vec();
        let b = loaded.forward(x).unwrap().to_vec();
        assert_eq!(a, b);
    }

    // training resumes with the same momentum history on both
    let ha = seeded_trainer(10, 1)
        .train(&mut net, &XOR_INPUTS, &XOR_TARGETS)
        .unwrap();
    let hb = seeded_trainer(10, 1)
        .train(&mut loaded, &XOR_INPUTS, &XOR_TARGETS)
        .unwrap();
    assert_eq!(ha, hb);
}

#[test]
fn convenience_train_runs_with_an_os_seed() {
    let mut net = Network::with_default_rates(2, 3, 1, false, &mut rand::rng()).unwrap();
    let history = net.train(&XOR_INPUTS, &XOR_TARGETS, 12).unwrap();

    assert_eq!(history.len(), 12);
    assert!(history.iter().all(|mse| mse.is_finite() && *mse >= 0.));
}
