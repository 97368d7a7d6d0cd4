#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    tests! {
        add in operator is OK
        "3"
        "string"
        "0.75"
    }

    tests! {
        precedence in operator is OK
        "7"
        "9"
        "26"
        "-6"
    }

    tests! {
        subtract in operator is OK
        "2"
        "-2"
        "1.25"
    }

    tests! {
        divide in operator is OK
        "4"
        "3.5"
        "inf"
    }

    tests! {
        compare in operator is OK
        "true"
        "true"
        "false"
        "true"
    }

    tests! {
        equality in operator is OK
        "true"
        "false"
        "true"
        "false"
        "true"
        "false"
        "false"
        "true"
    }

    tests! {
        add_mixed in operator is ERR
        "Operands must be two numbers or two strings."
        "[line 1]"
    }

    tests! {
        negate_string in operator is ERR
        "Operand must be a number."
        "[line 1]"
    }

    tests! {
        compare_string in operator is ERR
        "Operands must be numbers."
        "[line 1]"
    }

    tests! {
        multiply_string in operator is ERR
        "Operands must be numbers."
        "[line 1]"
    }
}
