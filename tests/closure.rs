#[macro_use]
mod common;

#[cfg(test)]
mod closure {
    tests! {
        counter in closure is OK
        "1"
        "2"
    }

    tests! {
        capture_block in closure is OK
        "global"
        "global"
    }

    tests! {
        shared_environment in closure is OK
        "initial"
        "shared"
    }

    tests! {
        late_binding in closure is OK
        "defined later"
    }

    tests! {
        close_over_parameter in closure is OK
        "param"
    }

    tests! {
        nested in closure is OK
        "a"
        "b"
    }
}
