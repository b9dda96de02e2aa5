/*!
# Benchmark Harness

Drives covering algorithms over sequences of box sizes, measures their wall-clock time and
writes one log file per (network, algorithm) pair:

- [`run`] times one run per box size and writes `{base}/{network}/{network}_{algorithm}.txt`,
- [`benchmark`] repeats the run `trials` times per box size and writes the timing statistics
  to `{base}/{network}/{network}_{algorithm}_benchmark.txt`,
- [`read_logfile`] and [`read_benchmark_file`] read these files back.

Only the algorithm itself is timed. Preparing the distance matrix (according to the
algorithm's [`DistancePolicy`]), validating the covering and writing logs happen outside the
timed region. For [`DistancePolicy::Shared`] algorithms, the caller declares the cost of the
shared distance computation as `time_offset`, which is added to every measurement.

# Example

```rust
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use ucover::{bench::*, gens::*, prelude::*};

let dir = tempfile::tempdir().unwrap();
let rng = &mut Pcg64Mcg::seed_from_u64(0);
let mut network = Network::new("grid", CsrGraph::grid(5, 5)).unwrap();
let algorithm: Algorithm = "greedy".parse().unwrap();

let names = LogNames::new(dir.path(), &network, &algorithm);
let records = run(&names, Duration::ZERO, &mut network, &[1, 2, 3], &algorithm, true, rng).unwrap();
assert_eq!(records[0].result.number_of_boxes(), 25);

let log = read_logfile(names.log_path()).unwrap();
assert_eq!(log.records, records);
```
*/

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{info, warn};
use rand::Rng;

use crate::{
    covering::check_box_size,
    error::{Result, check_positive},
    io::*,
    prelude::*,
    utils::mean_and_variance,
};

/// Names and location of the log files of one (network, algorithm) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNames {
    base: PathBuf,
    network: String,
    algorithm: String,
}

impl LogNames {
    /// Log files of `algorithm` on `network` below `base`
    pub fn new<P: AsRef<Path>>(base: P, network: &Network, algorithm: &Algorithm) -> Self {
        Self::from_names(base, network.name(), algorithm.name())
    }

    /// Log files with explicit names, e.g. for a configured variant of an algorithm
    pub fn from_names<P, S, T>(base: P, network: S, algorithm: T) -> Self
    where
        P: AsRef<Path>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            base: base.as_ref().to_path_buf(),
            network: network.into(),
            algorithm: algorithm.into(),
        }
    }

    /// `{base}/{network}`
    pub fn directory(&self) -> PathBuf {
        self.base.join(&self.network)
    }

    /// `{base}/{network}/{network}_{algorithm}.txt`
    pub fn log_path(&self) -> PathBuf {
        self.directory()
            .join(format!("{}_{}.txt", self.network, self.algorithm))
    }

    /// `{base}/{network}/{network}_{algorithm}_benchmark.txt`
    pub fn benchmark_path(&self) -> PathBuf {
        self.directory()
            .join(format!("{}_{}_benchmark.txt", self.network, self.algorithm))
    }

    fn create_file(&self, path: PathBuf) -> Result<BufWriter<File>> {
        check_names(&self.network, &self.algorithm)?;
        fs::create_dir_all(self.directory())?;
        Ok(BufWriter::new(File::create(path)?))
    }
}

/// Brings the distance matrix into the state `policy` requires before timing
fn prepare_distances(network: &mut Network, policy: DistancePolicy) -> Result<()> {
    match policy {
        DistancePolicy::Shared => {
            if !network.has_distances() {
                warn!(
                    "Distances of {} were not precomputed; computing them outside the timed region",
                    network.name()
                );
                network.ensure_distances()?;
            }
        }
        DistancePolicy::Dropped | DistancePolicy::Private => network.drop_distances(),
    }
    Ok(())
}

/// Runs the algorithm once and returns the elapsed time and the validated partition
fn timed_cover<R>(
    network: &mut Network,
    size: u32,
    algorithm: &Algorithm,
    rng: &mut R,
) -> Result<(Duration, Partition)>
where
    R: Rng,
{
    let policy = algorithm.distance_policy();
    prepare_distances(network, policy)?;

    let start = Instant::now();
    if policy == DistancePolicy::Private {
        network.ensure_distances()?;
    }
    let partition = algorithm.cover(network, size, rng)?;
    let elapsed = start.elapsed();

    algorithm.validate(network, size, &partition)?;
    if policy == DistancePolicy::Private {
        network.drop_distances();
    }

    Ok((elapsed, partition))
}

/// Runs `algorithm` once per box size and writes one record per size to [`LogNames::log_path`].
///
/// Every recorded time includes `time_offset` if the algorithm shares the precomputed
/// distance matrix ([`DistancePolicy::Shared`]). With `boxing`, only box counts (or centres,
/// see [`Remcc::return_centres`](crate::covering::Remcc::return_centres)) are recorded;
/// otherwise the box of every node.
///
/// # Errors
/// Fails before running anything if a box size is `0` or if the network or algorithm name is
/// empty or contains whitespace. Errors of the algorithm, including
/// [`CoverError::PartitionValidation`], abort the run; every record is flushed as soon as it
/// is written, so the records of completed sizes stay readable.
pub fn run<R>(
    names: &LogNames,
    time_offset: Duration,
    network: &mut Network,
    box_sizes: &[u32],
    algorithm: &Algorithm,
    boxing: bool,
    rng: &mut R,
) -> Result<Vec<LogRecord>>
where
    R: Rng,
{
    box_sizes.iter().try_for_each(|&size| check_box_size(size))?;
    let offset = match algorithm.distance_policy() {
        DistancePolicy::Shared => time_offset,
        _ => Duration::ZERO,
    };

    let mut writer = LogWriter::try_new(
        names.create_file(names.log_path())?,
        &names.network,
        &names.algorithm,
    )?;

    let mut records = Vec::with_capacity(box_sizes.len());
    for &size in box_sizes {
        let (elapsed, partition) = timed_cover(network, size, algorithm, rng)?;
        let covering = algorithm.report(partition, boxing);

        let record = LogRecord {
            box_size: size,
            time: (elapsed + offset).as_secs_f64(),
            result: LogResult::from(&covering),
        };
        info!(
            "{} on {}: size {size}, {} boxes in {:.6}s",
            names.algorithm,
            names.network,
            covering.number_of_boxes(),
            record.time
        );

        writer.try_write(&record)?;
        writer.flush()?;
        records.push(record);
    }
    writer.finish()?;

    Ok(records)
}

/// Runs `algorithm` `trials` times per box size and writes the timing statistics to
/// [`LogNames::benchmark_path`]. Every covering is validated.
///
/// # Errors
/// Fails with [`CoverError::InvalidParameter`] if `trials == 0`, and otherwise like [`run`].
pub fn benchmark<R>(
    names: &LogNames,
    network: &mut Network,
    box_sizes: &[u32],
    algorithm: &Algorithm,
    trials: u32,
    rng: &mut R,
) -> Result<Vec<BenchmarkRecord>>
where
    R: Rng,
{
    check_positive("trials", trials)?;
    box_sizes.iter().try_for_each(|&size| check_box_size(size))?;

    let mut writer = BenchmarkWriter::try_new(
        names.create_file(names.benchmark_path())?,
        &names.network,
        &names.algorithm,
    )?;

    let mut records = Vec::with_capacity(box_sizes.len());
    for &size in box_sizes {
        let mut times = Vec::with_capacity(trials as usize);
        for _ in 0..trials {
            let (elapsed, _) = timed_cover(network, size, algorithm, rng)?;
            times.push(elapsed.as_secs_f64());
        }

        let (mean, variance) = mean_and_variance(&times);
        let record = BenchmarkRecord {
            box_size: size,
            trials,
            mean,
            variance,
            min: times.iter().copied().fold(f64::INFINITY, f64::min),
            max: times.iter().copied().fold(0.0, f64::max),
        };
        info!(
            "{} on {}: size {size}, {trials} trials, mean {:.6}s",
            names.algorithm, names.network, record.mean
        );

        writer.try_write(&record)?;
        writer.flush()?;
        records.push(record);
    }
    writer.finish()?;

    Ok(records)
}

/// Reads a run log written by [`run`]
pub fn read_logfile<P: AsRef<Path>>(path: P) -> Result<LogFile<LogRecord>> {
    Ok(read_log(BufReader::new(File::open(path)?))?)
}

/// Reads a benchmark log written by [`benchmark`]
pub fn read_benchmark_file<P: AsRef<Path>>(path: P) -> Result<LogFile<BenchmarkRecord>> {
    Ok(read_benchmark_log(BufReader::new(File::open(path)?))?)
}

/// Estimates the box dimension `d` from `(box size, box count)` pairs, assuming
/// `count ~ size^(-d)`: the negated least-squares slope of `ln count` over `ln size`.
///
/// Returns `None` for fewer than two distinct box sizes.
pub fn box_dimension<I>(points: I) -> Option<f64>
where
    I: IntoIterator<Item = (u32, NumNodes)>,
{
    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .into_iter()
        .filter(|&(size, count)| size > 0 && count > 0)
        .map(|(size, count)| ((size as f64).ln(), (count as f64).ln()))
        .unzip();

    let (mean_x, var_x) = mean_and_variance(&xs);
    if xs.len() < 2 || var_x <= 0.0 {
        return None;
    }

    let (mean_y, _) = mean_and_variance(&ys);
    let covariance = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / xs.len() as f64;

    Some(-covariance / var_x)
}

#[cfg(test)]
mod tests {
    use std::{io::ErrorKind, panic::AssertUnwindSafe};

    use rand::{RngCore, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{covering::*, gens::*};

    /// Counts the values it hands out and panics once `limit` is reached
    struct LimitedRng {
        inner: Pcg64Mcg,
        draws: usize,
        limit: Option<usize>,
    }

    impl LimitedRng {
        fn new(seed: u64, limit: Option<usize>) -> Self {
            Self {
                inner: Pcg64Mcg::seed_from_u64(seed),
                draws: 0,
                limit,
            }
        }

        fn draw(&mut self) {
            if Some(self.draws) == self.limit {
                panic!("random source exhausted after {} draws", self.draws);
            }
            self.draws += 1;
        }
    }

    impl RngCore for LimitedRng {
        fn next_u32(&mut self) -> u32 {
            self.draw();
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draw();
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.draw();
            self.inner.fill_bytes(dst)
        }
    }

    #[test]
    fn paths() {
        let names = LogNames::from_names("/data", "karate", "memb");
        assert_eq!(names.log_path(), PathBuf::from("/data/karate/karate_memb.txt"));
        assert_eq!(
            names.benchmark_path(),
            PathBuf::from("/data/karate/karate_memb_benchmark.txt")
        );
    }

    #[test]
    fn run_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        let mut network = Network::new("path", CsrGraph::path(6)).unwrap();

        for (algorithm, boxing) in [
            (Algorithm::from(Greedy::new().order(NodeOrder::Natural)), false),
            (Algorithm::from(Remcc::new().return_centres(true)), true),
            (Algorithm::from_name("sa").unwrap(), true),
        ] {
            let names = LogNames::new(dir.path(), &network, &algorithm);
            let records = run(
                &names,
                Duration::from_millis(250),
                &mut network,
                &[1, 3, 6],
                &algorithm,
                boxing,
                rng,
            )
            .unwrap();

            let log = read_logfile(names.log_path()).unwrap();
            assert_eq!(log.network, "path");
            assert_eq!(log.algorithm, algorithm.name());
            assert_eq!(log.records, records);
            assert!(records.iter().all(|r| r.time >= 0.25));
        }

        let greedy = read_logfile(dir.path().join("path/path_greedy.txt")).unwrap();
        assert_eq!(
            greedy.records[1].result,
            LogResult::Partition(vec![0, 0, 0, 1, 1, 1])
        );
        assert_eq!(
            greedy.records.iter().map(|r| r.result.number_of_boxes()).collect::<Vec<_>>(),
            vec![6, 2, 1]
        );
    }

    #[test]
    fn distance_policies() {
        let dir = tempfile::tempdir().unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(2);
        let mut network = Network::new("grid", CsrGraph::grid(4, 4)).unwrap();
        network.ensure_distances().unwrap();

        for name in ["merge", "fuzzy"] {
            let algorithm = Algorithm::from_name(name).unwrap();
            let names = LogNames::new(dir.path(), &network, &algorithm);
            let records = run(
                &names,
                Duration::from_secs(100),
                &mut network,
                &[2, 3],
                &algorithm,
                true,
                rng,
            )
            .unwrap();

            // the offset only applies to algorithms sharing the precomputed matrix
            assert!(records.iter().all(|r| r.time < 100.0));
            assert!(!network.has_distances());
        }

        let algorithm = Algorithm::from_name("cbb").unwrap();
        let names = LogNames::new(dir.path(), &network, &algorithm);
        run(&names, Duration::ZERO, &mut network, &[2], &algorithm, true, rng).unwrap();
        assert!(network.has_distances());
    }

    #[test]
    fn benchmark_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let mut network = Network::new("cycle", CsrGraph::cycle(12)).unwrap();
        let algorithm = Algorithm::from_name("random_sequential").unwrap();
        let names = LogNames::new(dir.path(), &network, &algorithm);

        let records = benchmark(&names, &mut network, &[1, 2], &algorithm, 5, rng).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.trials, 5);
            assert!(record.min <= record.max);
            assert!(record.min - 1e-12 <= record.mean && record.mean <= record.max + 1e-12);
            assert!(record.variance >= 0.0);
        }

        let log = read_benchmark_file(names.benchmark_path()).unwrap();
        assert_eq!(log.records, records);

        assert!(matches!(
            benchmark(&names, &mut network, &[1], &algorithm, 0, rng),
            Err(CoverError::InvalidParameter { name: "trials", .. })
        ));
    }

    #[test]
    fn invalid_sizes_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(0);
        let mut network = Network::new("path", CsrGraph::path(3)).unwrap();
        let algorithm = Algorithm::from_name("greedy").unwrap();
        let names = LogNames::new(dir.path(), &network, &algorithm);

        assert!(matches!(
            run(&names, Duration::ZERO, &mut network, &[2, 0], &algorithm, true, rng),
            Err(CoverError::InvalidBoxSize { size: 0 })
        ));
        assert!(!names.log_path().exists());
    }

    #[test]
    fn unnamed_network_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        let mut network = Network::new("", CsrGraph::path(4)).unwrap();
        let algorithm = Algorithm::from_name("greedy").unwrap();
        let names = LogNames::new(dir.path(), &network, &algorithm);

        let result = run(&names, Duration::ZERO, &mut network, &[1, 2], &algorithm, true, rng);
        assert!(matches!(result, Err(CoverError::Io(ref e)) if e.kind() == ErrorKind::InvalidInput));

        let result = benchmark(&names, &mut network, &[1], &algorithm, 2, rng);
        assert!(matches!(result, Err(CoverError::Io(ref e)) if e.kind() == ErrorKind::InvalidInput));

        assert!(!names.log_path().exists());
        assert!(!names.benchmark_path().exists());
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn aborted_run_keeps_written_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut network = Network::new("grid", CsrGraph::grid(5, 5)).unwrap();
        network.ensure_distances().unwrap();
        let algorithm = Algorithm::from_name("greedy").unwrap();
        let names = LogNames::new(dir.path(), &network, &algorithm);

        // count the random values the first box size consumes
        let mut counting = LimitedRng::new(7, None);
        let first = run(&names, Duration::ZERO, &mut network, &[2], &algorithm, false, &mut counting)
            .unwrap();
        assert!(counting.draws > 0);

        // the same seed then runs out while covering the second size
        let mut limited = LimitedRng::new(7, Some(counting.draws));
        let aborted = std::panic::catch_unwind(AssertUnwindSafe(|| {
            run(&names, Duration::ZERO, &mut network, &[2, 3, 4], &algorithm, false, &mut limited)
        }));
        assert!(aborted.is_err());

        let log = read_logfile(names.log_path()).unwrap();
        assert_eq!(log.network, "grid");
        assert_eq!(log.algorithm, "greedy");
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].box_size, 2);
        assert_eq!(log.records[0].result, first[0].result);
    }

    #[test]
    fn dimension_of_power_law() {
        let points = [1u32, 2, 4, 8].map(|lb| (lb, 4096 / (lb * lb)));
        let dimension = box_dimension(points).unwrap();
        assert!((dimension - 2.0).abs() < 1e-9);

        assert_eq!(box_dimension([(3, 10), (3, 12)]), None);
        assert_eq!(box_dimension(Vec::<(u32, NumNodes)>::new()), None);
    }

    #[test]
    fn flower_dimension() {
        // the (2,2)-flower has box dimension 2
        let rng = &mut Pcg64Mcg::seed_from_u64(4);
        let mut network = Network::new("flower", CsrGraph::flower(2, 2, 4)).unwrap();
        let algorithm = Algorithm::from(Cbb::new());

        let points: Vec<(u32, NumNodes)> = [2, 3, 5, 9]
            .into_iter()
            .map(|lb| {
                let count = algorithm.run(&mut network, lb, true, rng).unwrap();
                (lb, count.number_of_boxes())
            })
            .collect();
        let dimension = box_dimension(points).unwrap();
        assert!(dimension > 0.5 && dimension < 3.5);
    }
}
