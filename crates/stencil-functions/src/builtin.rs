//! The built-in function set.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngExt};

use crate::error::FunctionError;
use crate::keys;
use crate::registry::Functions;
use crate::store::ValueStore;

/// Longest string `generateRandomString` will produce.
const MAX_RANDOM_STRING_LEN: usize = 1024;

/// Mercury retrograde windows as `(begin, end)` unix timestamps, UTC
/// midnight, exclusive on both ends. Covers 2022 through 2030.
const RETROGRADE_WINDOWS: &[(i64, i64)] = &[
    (1_642_118_400, 1_643_846_400), // 2022-01-14 .. 2022-02-03
    (1_652_140_800, 1_654_214_400), // 2022-05-10 .. 2022-06-03
    (1_662_681_600, 1_664_668_800), // 2022-09-09 .. 2022-10-02
    (1_672_272_000, 1_674_000_000), // 2022-12-29 .. 2023-01-18
    (1_682_035_200, 1_684_022_400), // 2023-04-21 .. 2023-05-14
    (1_692_748_800, 1_694_736_000), // 2023-08-23 .. 2023-09-15
    (1_702_425_600, 1_704_067_200), // 2023-12-13 .. 2024-01-01
    (1_711_929_600, 1_714_003_200), // 2024-04-01 .. 2024-04-25
    (1_722_729_600, 1_724_803_200), // 2024-08-04 .. 2024-08-28
    (1_732_492_800, 1_734_220_800), // 2024-11-25 .. 2024-12-15
    (1_740_441_600, 1_742_428_800), // 2025-02-25 .. 2025-03-20
    (1_751_155_200, 1_753_228_800), // 2025-06-29 .. 2025-07-23
    (1_761_264_000, 1_762_992_000), // 2025-10-24 .. 2025-11-13
    (1_771_977_600, 1_773_964_800), // 2026-02-25 .. 2026-03-20
    (1_782_691_200, 1_784_764_800), // 2026-06-29 .. 2026-07-23
    (1_792_800_000, 1_794_528_000), // 2026-10-24 .. 2026-11-13
    (1_802_131_200, 1_804_032_000), // 2027-02-09 .. 2027-03-03
    (1_812_585_600, 1_814_659_200), // 2027-06-10 .. 2027-07-04
    (1_822_867_200, 1_824_681_600), // 2027-10-07 .. 2027-10-28
    (1_832_284_800, 1_834_099_200), // 2028-01-24 .. 2028-02-14
    (1_842_480_000, 1_844_467_200), // 2028-05-21 .. 2028-06-13
    (1_852_934_400, 1_854_835_200), // 2028-09-19 .. 2028-10-11
    (1_862_438_400, 1_864_166_400), // 2029-01-07 .. 2029-01-27
    (1_872_288_000, 1_874_361_600), // 2029-05-01 .. 2029-05-25
    (1_883_001_600, 1_884_902_400), // 2029-09-02 .. 2029-09-24
    (1_892_505_600, 1_894_233_600), // 2029-12-21 .. 2030-01-10
    (1_902_182_400, 1_904_256_000), // 2030-04-12 .. 2030-05-06
    (1_912_982_400, 1_915_056_000), // 2030-08-15 .. 2030-09-08
    (1_922_659_200, 1_924_387_200), // 2030-12-05 .. 2030-12-25
];

/// Registers the standard function set onto `registry`.
pub(crate) fn register(registry: Functions) -> Functions {
    registry
        .with_function("generateRandomString", |params, _store| {
            expect_params(1, params)?;
            random_string(&params[0])
        })
        .with_function("generateRandomStringVar", |params, store| {
            expect_params(2, params)?;
            let value = random_string(&params[1])?;
            store.set(params[0].clone(), value.clone());
            Ok(value)
        })
        .with_function("generateRandomInt", |params, _store| {
            expect_params(2, params)?;
            let min = parse_int(&params[0])?;
            let max = parse_int(&params[1])?;
            if max <= min {
                return Err(FunctionError::InvalidRange { min, max });
            }
            Ok(rand::rng().random_range(min..=max).to_string())
        })
        .with_function("pickRandom", |params, _store| {
            if params.is_empty() {
                return Err(FunctionError::ParameterCountAtLeast {
                    expected: 1,
                    provided: 0,
                });
            }
            let index = rand::rng().random_range(0..params.len());
            Ok(params[index].clone())
        })
        .with_function("setVar", |params, store| {
            expect_params(2, params)?;
            store.set(params[0].clone(), params[1].clone());
            Ok(params[1].clone())
        })
        .with_function("getVar", |params, _store| {
            // Bare parameters are resolved against the store by the engine
            // before the call, so the lookup already happened.
            expect_params(1, params)?;
            Ok(params[0].clone())
        })
        .with_function("generateRSA2048Key", |params, store| {
            keys::generate_rsa_key(2048, params, store)
        })
        .with_function("generateRSA4096Key", |params, store| {
            keys::generate_rsa_key(4096, params, store)
        })
        .with_function("mercuryInRetrograde", |params, _store| {
            expect_params(2, params)?;
            Ok(mercury_in_retrograde(&params[0], &params[1]))
        })
}

/// Fails unless exactly `expected` parameters were provided.
fn expect_params(expected: usize, params: &[String]) -> Result<(), FunctionError> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(FunctionError::ParameterCount {
            expected,
            provided: params.len(),
        })
    }
}

fn parse_int(value: &str) -> Result<i64, FunctionError> {
    value.parse().map_err(|source| FunctionError::InvalidInteger {
        value: value.to_owned(),
        source,
    })
}

/// Random hex string of exactly `length` characters.
fn random_string(length_param: &str) -> Result<String, FunctionError> {
    let length = parse_int(length_param)?;
    let length = usize::try_from(length).map_err(|_| FunctionError::InvalidLength {
        value: length_param.to_owned(),
    })?;
    if length > MAX_RANDOM_STRING_LEN {
        return Err(FunctionError::LengthLimit {
            provided: length,
            max: MAX_RANDOM_STRING_LEN,
        });
    }

    let mut bytes = vec![0u8; length.div_ceil(2)];
    rand::rng().fill_bytes(&mut bytes);
    let mut encoded = hex::encode(bytes);
    encoded.truncate(length);
    Ok(encoded)
}

fn mercury_in_retrograde(yes: &str, no: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));

    let Some((_, table_end)) = RETROGRADE_WINDOWS.last() else {
        return no.to_owned();
    };
    if now >= *table_end {
        return "dates past 2030 are not covered by the retrograde table".to_owned();
    }

    for (begin, end) in RETROGRADE_WINDOWS {
        if now > *begin && now < *end {
            return yes.to_owned();
        }
    }
    no.to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn call(name: &str, params: &[&str]) -> Result<String, FunctionError> {
        let functions = Functions::new();
        let mut store = ValueStore::new();
        let params: Vec<String> = params.iter().map(|p| (*p).to_owned()).collect();
        functions.call(name, &params, &mut store)
    }

    #[test]
    fn random_string_has_requested_length() {
        let value = call("generateRandomString", &["50"]).unwrap();
        assert_eq!(value.len(), 50);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn random_string_odd_length() {
        let value = call("generateRandomString", &["7"]).unwrap();
        assert_eq!(value.len(), 7);
    }

    #[test]
    fn random_string_rejects_bad_lengths() {
        assert!(matches!(
            call("generateRandomString", &["over9000"]).unwrap_err(),
            FunctionError::InvalidInteger { .. }
        ));
        assert!(matches!(
            call("generateRandomString", &["-1"]).unwrap_err(),
            FunctionError::InvalidLength { .. }
        ));
        assert!(matches!(
            call("generateRandomString", &["1025"]).unwrap_err(),
            FunctionError::LengthLimit { provided: 1025, max: 1024 }
        ));
    }

    #[test]
    fn random_string_param_count() {
        let err = call("generateRandomString", &["10", "20"]).unwrap_err();
        assert!(matches!(
            err,
            FunctionError::ParameterCount {
                expected: 1,
                provided: 2
            }
        ));
    }

    #[test]
    fn random_int_stays_in_range() {
        for _ in 0..50 {
            let value: i64 = call("generateRandomInt", &["-3", "7"]).unwrap().parse().unwrap();
            assert!((-3..=7).contains(&value));
        }
    }

    #[test]
    fn random_int_rejects_empty_range() {
        assert!(matches!(
            call("generateRandomInt", &["9", "9"]).unwrap_err(),
            FunctionError::InvalidRange { min: 9, max: 9 }
        ));
        assert!(matches!(
            call("generateRandomInt", &["10", "1"]).unwrap_err(),
            FunctionError::InvalidRange { min: 10, max: 1 }
        ));
    }

    #[test]
    fn pick_random_picks_a_parameter() {
        let value = call("pickRandom", &["red", "green", "blue"]).unwrap();
        assert!(["red", "green", "blue"].contains(&value.as_str()));

        assert_eq!(call("pickRandom", &["only"]).unwrap(), "only");
        assert!(matches!(
            call("pickRandom", &[]).unwrap_err(),
            FunctionError::ParameterCountAtLeast { expected: 1, provided: 0 }
        ));
    }

    #[test]
    fn set_var_stores_and_returns() {
        let functions = Functions::new();
        let mut store = ValueStore::new();
        let result = functions
            .call(
                "setVar",
                &["name".to_owned(), "custom value".to_owned()],
                &mut store,
            )
            .unwrap();
        assert_eq!(result, "custom value");
        assert_eq!(store.get("name"), Some("custom value"));
    }

    #[test]
    fn random_string_var_stores_result() {
        let functions = Functions::new();
        let mut store = ValueStore::new();
        let result = functions
            .call(
                "generateRandomStringVar",
                &["token".to_owned(), "32".to_owned()],
                &mut store,
            )
            .unwrap();
        assert_eq!(result.len(), 32);
        assert_eq!(store.get("token"), Some(result.as_str()));
    }

    #[test]
    fn get_var_echoes_resolved_value() {
        // The engine resolves bare names before the call; getVar only passes
        // the resolved value through.
        assert_eq!(call("getVar", &["already resolved"]).unwrap(), "already resolved");
    }

    #[test]
    fn mercury_answers_one_of_the_two() {
        let value = call("mercuryInRetrograde", &["yes", "no"]).unwrap();
        assert!(value == "yes" || value == "no");
    }
}
