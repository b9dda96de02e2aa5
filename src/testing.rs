/// Every covering algorithm must produce valid, complete and reproducible coverings.
///
/// `test_covering!(module_name, configured_algorithm)` generates a test module running the
/// algorithm on a set of small networks for every box size from `1` to `diameter + 1`.
macro_rules! test_covering {
    ($env:ident, $algo:expr) => {
        #[cfg(test)]
        mod $env {
            use crate::{covering::*, gens::*, prelude::*};
            use rand::SeedableRng;
            use rand_pcg::Pcg64Mcg;

            fn algorithm() -> Algorithm {
                Algorithm::from($algo)
            }

            /// Small connected networks with known structure
            fn networks() -> Vec<Network> {
                let rng = &mut Pcg64Mcg::seed_from_u64(17);
                let mut networks = vec![
                    Network::new("path", CsrGraph::path(6)).unwrap(),
                    Network::new("cycle", CsrGraph::cycle(9)).unwrap(),
                    Network::new("grid", CsrGraph::grid(4, 5)).unwrap(),
                    Network::new("star", CsrGraph::star(7)).unwrap(),
                    Network::new("flower", CsrGraph::flower(2, 2, 3)).unwrap(),
                    Network::new("single", CsrGraph::path(1)).unwrap(),
                ];
                for i in 0..3 {
                    let tree = CsrGraph::random_tree(rng, 30);
                    networks.push(Network::new(format!("tree{i}"), tree).unwrap());
                }
                networks
            }

            #[test]
            fn valid_and_complete() {
                let algo = algorithm();
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for mut network in networks() {
                    let diameter = network.diameter().unwrap() as u32;
                    for size in 1..=diameter + 1 {
                        let covering = algo.run(&mut network, size, false, rng).unwrap();
                        let partition = covering.partition().unwrap();

                        assert!(partition.is_complete());
                        assert_eq!(partition.number_of_nodes(), network.number_of_nodes());
                        assert_eq!(partition.number_of_box_ids(), partition.number_of_boxes());
                        assert!(algo.validate(&network, size, partition).is_ok());
                    }
                }
            }

            #[test]
            fn boundaries() {
                let algo = algorithm();
                let rng = &mut Pcg64Mcg::seed_from_u64(5);

                for mut network in networks() {
                    let n = network.number_of_nodes();
                    let diameter = network.diameter().unwrap() as u32;

                    match algo.family() {
                        Family::Diameter => {
                            let singletons = algo.run(&mut network, 1, true, rng).unwrap();
                            assert_eq!(singletons.number_of_boxes(), n);
                            let single = algo.run(&mut network, diameter + 1, true, rng).unwrap();
                            assert_eq!(single.number_of_boxes(), 1);
                        }
                        Family::Radius => {
                            let single = algo.run(&mut network, diameter.max(1), true, rng).unwrap();
                            assert_eq!(single.number_of_boxes(), 1);
                        }
                    }
                }
            }

            #[test]
            fn count_consistency() {
                let algo = algorithm();

                for mut network in networks() {
                    for size in 1..4 {
                        let count = algo
                            .run(&mut network, size, true, &mut Pcg64Mcg::seed_from_u64(size as u64))
                            .unwrap();
                        let full = algo
                            .run(&mut network, size, false, &mut Pcg64Mcg::seed_from_u64(size as u64))
                            .unwrap();
                        assert_eq!(count.number_of_boxes(), full.number_of_boxes());
                    }
                }
            }

            #[test]
            fn reproducible() {
                let algo = algorithm();

                for mut network in networks() {
                    network.ensure_distances().unwrap();
                    for seed in 0..3 {
                        let first = algo
                            .cover(&network, 3, &mut Pcg64Mcg::seed_from_u64(seed))
                            .unwrap();
                        let second = algo
                            .cover(&network, 3, &mut Pcg64Mcg::seed_from_u64(seed))
                            .unwrap();
                        assert_eq!(first, second);
                    }
                }
            }

            #[test]
            fn rejects_zero() {
                let algo = algorithm();
                let rng = &mut Pcg64Mcg::seed_from_u64(0);
                let mut network = Network::new("path", CsrGraph::path(3)).unwrap();
                assert!(matches!(
                    algo.run(&mut network, 0, false, rng),
                    Err(CoverError::InvalidBoxSize { .. })
                ));
            }
        }
    };
}

pub(crate) use test_covering;
