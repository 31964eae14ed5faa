use ferrite_mlp::train::EpochStats;
use ferrite_mlp::{
    accuracy, train_loop, ActivationFunction, LearningRateSchedule, LossType, Matrix, Network,
    TrainConfig,
};

fn main() -> ferrite_mlp::Result<()> {
    let mut network = Network::new(
        2,
        &[2, 1],
        &[ActivationFunction::Tanh, ActivationFunction::Sigmoid],
    )?;

    // Fixed starting point so every run converges the same way.
    network.layers_mut()[0].set_weights(Matrix::from_rows(vec![
        vec![0.3, -0.6],
        vec![0.75, -0.9],
    ])?)?;
    network.layers_mut()[1].set_weights(Matrix::from_rows(vec![vec![0.4, -0.7]])?)?;

    // One sample per column.
    let inputs = Matrix::from_rows(vec![
        vec![0.0, 0.0, 1.0, 1.0],
        vec![0.0, 1.0, 0.0, 1.0],
    ])?;
    let expected = Matrix::from_rows(vec![vec![0.0, 1.0, 1.0, 0.0]])?;

    let config = TrainConfig::new(LossType::Bce, 1000, LearningRateSchedule::fixed(0.1))
        .with_report_every(100);

    let mut print_progress = |s: &EpochStats| {
        println!("Epoch {}/{}: loss = {:.6}", s.epoch, s.total_epochs, s.loss);
    };
    train_loop(&mut network, &inputs, &expected, &config, &mut print_progress)?;

    let output = network.forward(&inputs)?;
    println!("Output:\n{output}");
    println!("Accuracy: {:.0}%", accuracy(&output, &expected)? * 100.0);
    Ok(())
}
