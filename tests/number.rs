#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        integers in number is OK
        "123"
        "987654"
        "0"
        "-0"
    }

    tests! {
        decimals in number is OK
        "123.456"
        "0.25"
        "2.5"
    }

    tests! {
        nan in number is OK
        "NaN"
    }
}
