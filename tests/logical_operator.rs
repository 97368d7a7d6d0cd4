#[macro_use]
mod common;

#[cfg(test)]
mod logical_operator {
    tests! {
        and in logical_operator is OK
        "1"
        "false"
        "false"
        "nil"
    }

    tests! {
        or in logical_operator is OK
        "1"
        "yes"
        "false"
        "nil"
    }

    tests! {
        short_circuit in logical_operator is OK
        "before"
        "or"
        "or"
    }
}
